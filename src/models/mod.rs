//! Data structures used throughout the library.

pub mod job;
mod datetime;
mod error;

pub use self::datetime::DateTime;
pub use self::error::{DecodeError, EncodeError, ErrorKind};
