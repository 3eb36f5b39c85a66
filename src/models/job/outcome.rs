//! Defines the result a worker reports back for a job, and a helper for running typed handlers.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::EncodeError;
use crate::models::job::{Field, Job, PayloadCodec, PayloadMap};

/// Outcome of a worker handling a single job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum JobOutcome {
    /// Job completed successfully. Contains the JSON object text to send back as the job's
    /// resulting payload.
    Complete { payload: String },

    /// Job failed. Contains the number of retries the job should have left, and a message
    /// describing why it failed.
    Fail { retries: i32, error_message: String },
}

impl JobOutcome {
    /// Complete a job without adding any data to its payload.
    pub fn complete() -> Self {
        JobOutcome::Complete { payload: "{}".to_owned() }
    }

    /// Complete a job with the given map as its resulting payload.
    pub fn complete_with_map(payload: &PayloadMap) -> Result<Self, EncodeError> {
        Self::complete_with(payload)
    }

    /// Complete a job with the given value as its resulting payload. The value must serialise
    /// to a JSON object.
    pub fn complete_with<T: Serialize + ?Sized>(payload: &T) -> Result<Self, EncodeError> {
        match serde_json::to_value(payload)? {
            value @ Value::Object(_) => Ok(JobOutcome::Complete { payload: value.to_string() }),
            other => Err(EncodeError::NotAnObject(json_type(&other))),
        }
    }

    /// Fail a job, using up one of its remaining retries.
    pub fn fail<S: Into<String>>(job: &Job, error_message: S) -> Self {
        JobOutcome::Fail {
            retries: job.retries().saturating_sub(1).max(0),
            error_message: error_message.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            JobOutcome::Complete { .. } => true,
            JobOutcome::Fail { .. }     => false,
        }
    }
}

/// Decode a job's payload as `T` and pass it to `handler`.
///
/// A payload that fails to decode fails the job rather than reaching the handler, using up one
/// of its retries, with the decode error as the failure message.
pub fn handle_job<T, F>(job: &Job, codec: PayloadCodec, handler: F) -> JobOutcome
where
    T: Default + Serialize + DeserializeOwned,
    F: FnOnce(&Job, T) -> JobOutcome,
{
    match codec.payload_as::<T>(job) {
        Ok(input) => {
            debug!("[job:{}] decoded {} for {} job", job.key(), Field::Payload, job.job_type());
            handler(job, input)
        }
        Err(err) => {
            warn!("[job:{}] failing {} job: {}", job.key(), job.job_type(), err);
            JobOutcome::fail(job, err.to_string())
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
