//! Decoding of a job's JSON encoded text fields into maps or caller-defined types.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::DecodeError;
use crate::models::job::{Field, Job};

/// Generic, untyped view of a decoded payload or custom headers object.
///
/// Key order from the source text is not preserved.
pub type PayloadMap = HashMap<String, Value>;

/// Determines how a source consisting of the empty string is decoded.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all="snake_case")]
pub enum EmptySource {
    /// Empty source is invalid JSON, and fails to decode.
    #[default]
    Reject,

    /// Empty (or whitespace only) source decodes as if it were `{}`. Intended for engines that
    /// send an empty string rather than `{}` to signal "no payload".
    EmptyObject,
}

/// Decodes JSON object text into either a `PayloadMap`, or any type implementing `Deserialize`.
///
/// Stateless apart from its empty source policy, so can be freely copied and shared between
/// threads. Every call is a pure function of its input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PayloadCodec {
    empty_source: EmptySource,
}

impl PayloadCodec {
    pub fn new(empty_source: EmptySource) -> Self {
        Self { empty_source }
    }

    pub fn empty_source(&self) -> EmptySource {
        self.empty_source
    }

    /// Decode source text into a map of keys to dynamically typed values.
    ///
    /// Fails if the source isn't valid JSON, or if its top-level value is not an object.
    pub fn decode_as_map(&self, source: &str) -> Result<PayloadMap, DecodeError> {
        Ok(self.decode_object(source)?.into_iter().collect())
    }

    /// Decode source text into a new instance of `T`, matching object keys to the field names
    /// declared by `T`'s `Deserialize` implementation.
    ///
    /// Equivalent to `decode_into` on `T::default()`: keys not known to `T` are ignored (unless
    /// `T` denies unknown fields), and fields with no matching key keep their default value.
    /// Top-level arrays are rejected rather than decoded positionally.
    pub fn decode_as<T>(&self, source: &str) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        let mut destination = T::default();
        self.decode_into(source, &mut destination)?;
        Ok(destination)
    }

    /// Decode source text onto an existing `destination`.
    ///
    /// Each top-level key present in the source replaces the corresponding field of
    /// `destination` as a whole, while fields with no matching key keep their current value.
    ///
    /// Fields are carried over by serialising `destination` to JSON and back, so its current
    /// values must survive that round trip. A float field holding NaN or infinity serialises to
    /// `null`, and fails to decode back unless the source replaces that field.
    ///
    /// `destination` is only written once the whole decode has succeeded, so on error it is left
    /// exactly as it was.
    pub fn decode_into<T>(&self, source: &str, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        let object = self.decode_object(source)?;

        let merged = match serde_json::to_value(&*destination).map_err(DecodeError::new)? {
            Value::Object(mut current) => {
                current.extend(object);
                Value::Object(current)
            }
            // destination doesn't serialise as an object, so has no fields to keep
            _ => Value::Object(object),
        };

        *destination = serde_json::from_value(merged).map_err(DecodeError::new)?;
        Ok(())
    }

    pub fn payload_as_map(&self, job: &Job) -> Result<PayloadMap, DecodeError> {
        self.field_as_map(job, Field::Payload)
    }

    pub fn payload_as<T>(&self, job: &Job) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        self.field_as(job, Field::Payload)
    }

    pub fn payload_into<T>(&self, job: &Job, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.field_into(job, Field::Payload, destination)
    }

    pub fn custom_headers_as_map(&self, job: &Job) -> Result<PayloadMap, DecodeError> {
        self.field_as_map(job, Field::CustomHeaders)
    }

    pub fn custom_headers_as<T>(&self, job: &Job) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        self.field_as(job, Field::CustomHeaders)
    }

    pub fn custom_headers_into<T>(&self, job: &Job, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.field_into(job, Field::CustomHeaders, destination)
    }

    /// Decode the text of any of the job's JSON fields into a map.
    pub fn field_as_map(&self, job: &Job, field: Field) -> Result<PayloadMap, DecodeError> {
        self.decode_as_map(job.text(field)).map_err(|err| err.with_field(field))
    }

    /// Decode the text of any of the job's JSON fields into a new instance of `T`.
    pub fn field_as<T>(&self, job: &Job, field: Field) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        self.decode_as(job.text(field)).map_err(|err| err.with_field(field))
    }

    /// Decode the text of any of the job's JSON fields onto an existing `destination`.
    pub fn field_into<T>(&self, job: &Job, field: Field, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.decode_into(job.text(field), destination).map_err(|err| err.with_field(field))
    }

    /// Parse source text, requiring a JSON object at the top level.
    fn decode_object(&self, source: &str) -> Result<Map<String, Value>, DecodeError> {
        if self.empty_source == EmptySource::EmptyObject && source.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(source).map_err(DecodeError::new)
    }
}
