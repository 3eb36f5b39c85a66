use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const PAYLOAD_FIELD: &str = "payload";
const CUSTOM_HEADERS_FIELD: &str = "customHeaders";

/// Represents one of the JSON encoded text fields of an activated job.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all="camelCase")]
pub enum Field {
    Payload,
    CustomHeaders,
}

impl Field {
    pub fn all_fields() -> &'static [Field] {
        static ALL_FIELDS: [Field; 2] = [
            Field::Payload,
            Field::CustomHeaders,
        ];

        &ALL_FIELDS
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl AsRef<str> for Field {
    fn as_ref(&self) -> &str {
        match self {
            Field::Payload       => PAYLOAD_FIELD,
            Field::CustomHeaders => CUSTOM_HEADERS_FIELD,
        }
    }
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Field, ()> {
        match s {
            PAYLOAD_FIELD        => Ok(Field::Payload),
            CUSTOM_HEADERS_FIELD => Ok(Field::CustomHeaders),
            _ => Err(()),
        }
    }
}
