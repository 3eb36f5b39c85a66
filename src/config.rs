//! Configuration parsing.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use regex::Captures;
use regex::Regex;
use serde::de::Deserializer;
use serde::Deserialize;

use crate::models::job::{EmptySource, PayloadCodec};

const INTERPOLATE_RE: &str = r"(?m)\$\{([A-Z][A-Z0-9_]*)(?:=([^}]+))?\}";

const DEFAULT_MAX_JOB_SIZE: usize = 1024 * 1024;

/// Main application config, typically read from a `.toml` file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Configuration for decoding job payloads and custom headers.
    #[serde(default)]
    pub decode: DecodeConfig,

    /// Configuration for logging.
    #[serde(default)]
    pub log: LogConfig,

    /// Configuration for the `job-payload` inspection tool.
    #[serde(default)]
    pub inspect: InspectConfig,
}

impl Config {
    /// Read configuration from a file into a new Config struct.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        debug!("Reading configuration from {}", path.display());

        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(err.to_string()),
        };

        Self::parse(&data)
    }

    /// Parse configuration from TOML text, after replacing any `${VAR}` or `${VAR=default}`
    /// references with values from the environment.
    pub fn parse(raw_toml: &str) -> Result<Self, String> {
        let data = Self::interpolate_env(raw_toml);
        toml::from_str(&data).map_err(|err| err.to_string())
    }

    /// Get a codec using the configured decoding policy.
    pub fn codec(&self) -> PayloadCodec {
        PayloadCodec::new(self.decode.empty_source)
    }

    fn interpolate_env(raw_toml: &str) -> Cow<'_, str> {
        let re = Regex::new(INTERPOLATE_RE)
            .expect("failed to compile interpolation regex");

        re.replace_all(raw_toml, |captures: &Captures| {
            let var_name = captures.get(1)
                .expect("capture should have at least 1 group");

            match std::env::var(var_name.as_str()) {
                Ok(env_val) => env_val,
                Err(_) => captures.get(2).map_or_else(String::new, |v| v.as_str().to_owned())
            }
        })
    }
}

/// Configuration for decoding job payloads and custom headers.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// How to decode a payload or custom headers that are the empty string. Either "reject"
    /// (fail to decode) or "empty_object" (decode as `{}`). Defaults to "reject".
    pub empty_source: EmptySource,
}

/// Configuration for logging.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Sets the application-wide log level. Defaults to "info". Can be overridden using the
    /// `RUST_LOG` environment variable.
    #[serde(deserialize_with = "deserialize_log_level")]
    pub level: log::Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: log::Level::Info }
    }
}

/// Configuration for the `job-payload` inspection tool.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Maximum size of job JSON that will be read, e.g. "512 kB". Defaults to 1 MiB.
    #[serde(deserialize_with = "deserialize_human_size")]
    pub max_job_size: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        InspectConfig { max_job_size: DEFAULT_MAX_JOB_SIZE }
    }
}

fn deserialize_human_size<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<usize, D::Error> {
    let s: String = Deserialize::deserialize(deserializer)?;
    let size: human_size::SpecificSize<human_size::Byte> = match s.parse() {
        Ok(size) => size,
        Err(_) => {
            return Err(serde::de::Error::custom(format!(
                "Unable to parse size '{}'",
                s
            )))
        }
    };
    let bytes = size.value();
    if !bytes.is_finite() || bytes <= 0.0 || bytes.fract() != 0.0 || bytes > usize::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "Size must be a positive whole number of bytes, got '{}'",
            s
        )));
    }
    Ok(bytes as usize)
}

fn deserialize_log_level<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<log::Level, D::Error> {
    let s: String = Deserialize::deserialize(deserializer)?;
    match log::Level::from_str(&s) {
        Ok(level) => Ok(level),
        Err(_) => Err(serde::de::Error::custom(format!(
            "Invalid log level: {}",
            s
        ))),
    }
}
