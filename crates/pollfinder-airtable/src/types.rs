//! Response shapes for the Airtable list-records endpoint.
//!
//! A successful page looks like:
//!
//! ```json
//! {"records": [{"id": "rec…", "createdTime": "…", "fields": {…}}], "offset": "itr…/rec…"}
//! ```
//!
//! `offset` is present only while more pages remain. Failed requests carry an
//! error envelope in one of two forms, depending on the failure:
//!
//! ```json
//! {"error": {"type": "INVALID_PERMISSIONS", "message": "…"}}
//! {"error": "NOT_FOUND"}
//! ```

use pollfinder_core::LocationRecord;
use serde::Deserialize;

/// One page of the list-records response.
#[derive(Debug, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub records: Vec<LocationRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorBody {
    Detailed {
        #[serde(rename = "type")]
        error_type: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl ErrorBody {
    pub(crate) fn into_parts(self) -> (String, String) {
        match self {
            ErrorBody::Detailed {
                error_type,
                message,
            } => {
                let message = message.unwrap_or_else(|| error_type.clone());
                (error_type, message)
            }
            ErrorBody::Code(code) => (code.clone(), code),
        }
    }
}
