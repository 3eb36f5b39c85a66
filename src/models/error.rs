//! Defines error types produced when decoding job payloads, or encoding a worker's reply.

use std::{error::Error, fmt};

use serde_json::error::Category;

use crate::models::job::Field;

/// Broad category of a decode failure.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Source text was not syntactically valid JSON.
    Syntax,

    /// Source text ended before a complete JSON value was read. This includes the empty string.
    Eof,

    /// Source text was valid JSON, but its shape or value types didn't match the requested
    /// destination, e.g. a top-level array when an object was required, or a string value
    /// targeting a numeric field.
    Data,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Eof    => write!(f, "eof"),
            ErrorKind::Data   => write!(f, "data"),
        }
    }
}

/// Error returned when a job's payload or custom headers can't be decoded into the requested
/// shape.
///
/// Covers both JSON syntax errors and mismatches between the JSON value and the destination.
/// A single incompatibility fails the whole decode, no partial result is returned.
#[derive(Debug)]
pub struct DecodeError {
    field: Option<Field>,
    err: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn new(err: serde_json::Error) -> Self {
        DecodeError { field: None, err }
    }

    /// Tag this error with the job field whose text failed to decode.
    pub(crate) fn with_field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    /// Job field that failed to decode, if the decode was run against a job rather than a bare
    /// string.
    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn kind(&self) -> ErrorKind {
        match self.err.classify() {
            Category::Eof => ErrorKind::Eof,
            Category::Data => ErrorKind::Data,
            // decoding only ever reads from in-memory strings, so I/O errors can't occur
            Category::Syntax | Category::Io => ErrorKind::Syntax,
        }
    }

    /// One-based line of the source text at which the error was detected, or 0 if the error
    /// was detected after parsing (e.g. a type mismatch).
    pub fn line(&self) -> usize {
        self.err.line()
    }

    /// One-based column of the source text at which the error was detected, or 0 if the error
    /// was detected after parsing.
    pub fn column(&self) -> usize {
        self.err.column()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "Failed to decode job {}: {}", field, self.err),
            None        => write!(f, "Failed to decode JSON: {}", self.err),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.err)
    }
}

/// Error returned when a value can't be used as the JSON payload of a completed job.
#[derive(Debug)]
pub enum EncodeError {
    /// Value could not be serialised to JSON at all, e.g. a map with non-string keys.
    Json(serde_json::Error),

    /// Value serialised to JSON, but not to an object. Contains the JSON type it serialised to.
    NotAnObject(&'static str),
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json(err)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::Json(err) => write!(f, "Failed to encode job payload: {}", err),
            EncodeError::NotAnObject(json_type) => {
                write!(f, "Job payload must be a JSON object, got {}", json_type)
            }
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Json(err) => Some(err),
            EncodeError::NotAnObject(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decode_err(source: &str) -> DecodeError {
        let err = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(source).unwrap_err();
        DecodeError::new(err)
    }

    #[test]
    fn kinds() {
        assert_eq!(decode_err("").kind(), ErrorKind::Eof);
        assert_eq!(decode_err("{\"foo\": ").kind(), ErrorKind::Eof);
        assert_eq!(decode_err("{foo}").kind(), ErrorKind::Syntax);
        assert_eq!(decode_err("[1, 2]").kind(), ErrorKind::Data);
    }

    #[test]
    fn display_with_field() {
        let err = decode_err("");
        assert!(err.to_string().starts_with("Failed to decode JSON: "));

        let err = err.with_field(Field::CustomHeaders);
        assert_eq!(err.field(), Some(Field::CustomHeaders));
        assert!(err.to_string().starts_with("Failed to decode job customHeaders: "));
    }

    #[test]
    fn source_is_serde_error() {
        let err = decode_err("nope");
        assert!(err.source().is_some());
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn encode_display() {
        let err = EncodeError::NotAnObject("array");
        assert_eq!(err.to_string(), "Job payload must be a JSON object, got array");
        assert!(err.source().is_none());
    }
}
