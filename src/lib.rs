//! Typed access to the JSON payload and custom headers of jobs activated from a workflow engine.
//!
//! Workers receive each job's payload and custom headers as raw JSON text. A `Job` exposes both
//! either as a generic `PayloadMap`, or decoded by field name into any type implementing
//! `serde::Deserialize`.

pub mod config;
pub mod inspect;
pub mod models;

pub use crate::models::job::{handle_job, EmptySource, Job, JobOutcome, PayloadCodec, PayloadMap};
pub use crate::models::{DecodeError, EncodeError};
