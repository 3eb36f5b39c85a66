//! Command line tool that prints the decoded payload and custom headers of an activated job.

use std::path::PathBuf;

use log::{info, warn};
use serde_json::json;
use structopt::StructOpt;

use job_payload::config::Config;
use job_payload::inspect;
use job_payload::models::job::Job;

/// Parsed command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "job-payload", about = "Decode the payload and custom headers of an activated job")]
struct CliOpts {
    #[structopt(short, long, parse(from_os_str), help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[structopt(parse(from_os_str), help = "Path to job JSON, read from stdin if not given")]
    job: Option<PathBuf>,
}

fn main() {
    let opts = CliOpts::from_args();

    let config = match &opts.config {
        Some(config_path) => match Config::from_file(config_path) {
            Ok(config) => config,
            Err(msg) => {
                eprintln!("Failed to parse config file {}: {}", config_path.display(), msg);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    // config sets the default level, RUST_LOG takes precedence when set
    let mut logger = env_logger::Builder::new();
    logger.filter_level(config.log.level.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    if opts.config.is_none() {
        warn!("No config file specified, using default config");
    }

    let raw_job = inspect::open_job(opts.job.as_deref())
        .and_then(|reader| inspect::read_job(reader, config.inspect.max_job_size));
    let raw_job = match raw_job {
        Ok(raw_job) => raw_job,
        Err(msg) => {
            eprintln!("Failed to read job: {}", msg);
            std::process::exit(1);
        }
    };

    let job: Job = match serde_json::from_str(&raw_job) {
        Ok(job) => job,
        Err(err) => {
            eprintln!("Failed to parse job: {}", err);
            std::process::exit(1);
        }
    };
    info!("[job:{}] inspecting {} job", job.key(), job.job_type());

    let codec = config.codec();
    let decoded = codec.payload_as_map(&job).and_then(|payload| {
        codec.custom_headers_as_map(&job).map(|custom_headers| (payload, custom_headers))
    });
    let (payload, custom_headers) = match decoded {
        Ok(decoded) => decoded,
        Err(err) => {
            eprintln!("[job:{}] {}", job.key(), err);
            std::process::exit(1);
        }
    };

    let output = json!({
        "payload": payload,
        "customHeaders": custom_headers,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("Failed to format output: {}", err);
            std::process::exit(1);
        }
    }
}
