mod codec;
mod field;
mod outcome;

pub use self::codec::{EmptySource, PayloadCodec, PayloadMap};
pub use self::field::Field;
pub use self::outcome::{handle_job, JobOutcome};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{DateTime, DecodeError};

/// Engine metadata describing where in a workflow a job was created.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all="camelCase")]
pub struct JobHeaders {
    pub workflow_instance_key: i64,
    pub bpmn_process_id: String,
    pub workflow_definition_version: i32,
    pub workflow_key: i64,
    pub element_id: String,
    pub element_instance_key: i64,
}

/// A job activated by the engine and handed to a worker.
///
/// Immutable once constructed. The payload and custom headers are kept as the raw JSON text
/// received from the engine, and are only interpreted when one of the decode functions is
/// called. Decoding never modifies the job, so a single job can be decoded any number of times,
/// from any number of threads.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all="camelCase")]
pub struct Job {
    key: i64,

    #[serde(rename="type")]
    job_type: String,

    #[serde(default)]
    job_headers: JobHeaders,

    #[serde(default)]
    custom_headers: String,

    #[serde(default)]
    worker: String,

    #[serde(default)]
    retries: i32,

    #[serde(default, skip_serializing_if="Option::is_none")]
    deadline: Option<DateTime>,

    #[serde(default)]
    payload: String,
}

impl Job {
    /// Create a job with the given key and type, no payload or custom headers, and no retries.
    ///
    /// Generally used by code that converts jobs received from the engine, other fields can be
    /// set using the `with_*` functions.
    pub fn new<S: Into<String>>(key: i64, job_type: S) -> Self {
        Self {
            key,
            job_type: job_type.into(),
            job_headers: JobHeaders::default(),
            custom_headers: String::new(),
            worker: String::new(),
            retries: 0,
            deadline: None,
            payload: String::new(),
        }
    }

    pub fn with_payload<S: Into<String>>(mut self, payload: S) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_custom_headers<S: Into<String>>(mut self, custom_headers: S) -> Self {
        self.custom_headers = custom_headers.into();
        self
    }

    pub fn with_job_headers(mut self, job_headers: JobHeaders) -> Self {
        self.job_headers = job_headers;
        self
    }

    pub fn with_worker<S: Into<String>>(mut self, worker: S) -> Self {
        self.worker = worker.into();
        self
    }

    pub fn with_retries(mut self, retries: i32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn key(&self) -> i64 {
        self.key
    }

    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    pub fn job_headers(&self) -> &JobHeaders {
        &self.job_headers
    }

    pub fn worker(&self) -> &str {
        &self.worker
    }

    /// Number of retries remaining for this job.
    pub fn retries(&self) -> i32 {
        self.retries
    }

    /// Time by which the worker must complete or fail this job, if the engine set one.
    pub fn deadline(&self) -> Option<DateTime> {
        self.deadline
    }

    /// Raw JSON text of this job's payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Raw JSON text of this job's custom headers.
    pub fn custom_headers(&self) -> &str {
        &self.custom_headers
    }

    /// Raw JSON text of the given field.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Payload       => &self.payload,
            Field::CustomHeaders => &self.custom_headers,
        }
    }

    /// Decode the payload into a map of keys to dynamically typed values.
    ///
    /// Fails if the payload is not a JSON object, including when it's the empty string. Use
    /// `PayloadCodec` directly to decode with a more lenient empty source policy.
    pub fn payload_as_map(&self) -> Result<PayloadMap, DecodeError> {
        PayloadCodec::default().payload_as_map(self)
    }

    /// Decode the payload into a new instance of `T`. See `PayloadCodec::decode_as`.
    pub fn payload_as<T>(&self) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        PayloadCodec::default().payload_as(self)
    }

    /// Decode the payload onto an existing `destination`. See `PayloadCodec::decode_into`.
    pub fn payload_into<T>(&self, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        PayloadCodec::default().payload_into(self, destination)
    }

    /// Decode the custom headers into a map of keys to dynamically typed values.
    pub fn custom_headers_as_map(&self) -> Result<PayloadMap, DecodeError> {
        PayloadCodec::default().custom_headers_as_map(self)
    }

    /// Decode the custom headers into a new instance of `T`.
    pub fn custom_headers_as<T>(&self) -> Result<T, DecodeError>
    where
        T: Default + Serialize + DeserializeOwned,
    {
        PayloadCodec::default().custom_headers_as(self)
    }

    /// Decode the custom headers onto an existing `destination`.
    pub fn custom_headers_into<T>(&self, destination: &mut T) -> Result<(), DecodeError>
    where
        T: Serialize + DeserializeOwned,
    {
        PayloadCodec::default().custom_headers_into(self, destination)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    const WIRE_JOB: &str = r#"{
        "key": 2251799813685257,
        "type": "payment-service",
        "jobHeaders": {
            "workflowInstanceKey": 2251799813685251,
            "bpmnProcessId": "order-process",
            "workflowDefinitionVersion": 3,
            "workflowKey": 2251799813685249,
            "elementId": "collect-money",
            "elementInstanceKey": 2251799813685256
        },
        "customHeaders": "{\"method\": \"VISA\"}",
        "worker": "payment-worker-1",
        "retries": 3,
        "deadline": 1536148800000,
        "payload": "{\"orderId\": 31243, \"total\": 99.95}"
    }"#;

    #[test]
    fn wire_deserialisation() {
        let job: Job = serde_json::from_str(WIRE_JOB).unwrap();

        assert_eq!(job.key(), 2251799813685257);
        assert_eq!(job.job_type(), "payment-service");
        assert_eq!(job.job_headers().bpmn_process_id, "order-process");
        assert_eq!(job.job_headers().workflow_definition_version, 3);
        assert_eq!(job.job_headers().element_id, "collect-money");
        assert_eq!(job.worker(), "payment-worker-1");
        assert_eq!(job.retries(), 3);
        assert_eq!(job.deadline().unwrap().timestamp_millis(), 1536148800000);
        assert_eq!(job.custom_headers(), "{\"method\": \"VISA\"}");
        assert_eq!(job.payload(), "{\"orderId\": 31243, \"total\": 99.95}");
    }

    #[test]
    fn wire_deserialisation_minimal() {
        let job: Job = serde_json::from_str(r#"{"key": 1, "type": "noop"}"#).unwrap();
        assert_eq!(job, Job::new(1, "noop"));
        assert_eq!(job.payload(), "");
        assert!(job.deadline().is_none());

        assert!(serde_json::from_str::<Job>(r#"{"type": "noop"}"#).is_err());
    }

    #[test]
    fn wire_roundtrip() {
        let job: Job = serde_json::from_str(WIRE_JOB).unwrap();
        let ser = serde_json::to_string(&job).unwrap();
        let deser: Job = serde_json::from_str(&ser).unwrap();
        assert_eq!(job, deser);
    }

    #[test]
    fn decode_fields() {
        let job: Job = serde_json::from_str(WIRE_JOB).unwrap();

        let payload = job.payload_as_map().unwrap();
        assert_eq!(payload["orderId"], json!(31243));
        assert_eq!(payload["total"], json!(99.95));

        let headers = job.custom_headers_as_map().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["method"], json!("VISA"));
    }

    #[test]
    fn decode_error_names_field() {
        let job = Job::new(1, "noop").with_payload("{}").with_custom_headers("[]");

        assert!(job.payload_as_map().is_ok());
        let err = job.custom_headers_as_map().unwrap_err();
        assert_eq!(err.field(), Some(Field::CustomHeaders));

        let job = Job::new(1, "noop").with_custom_headers("{}");
        let err = job.payload_as::<PayloadMap>().unwrap_err();
        assert_eq!(err.field(), Some(Field::Payload));
    }

    #[test]
    fn text_by_field() {
        let job = Job::new(1, "noop").with_payload("p").with_custom_headers("h");
        assert_eq!(job.text(Field::Payload), "p");
        assert_eq!(job.text(Field::CustomHeaders), "h");
    }
}
