//! Errors raised while reading queue list responses

use thiserror::Error;

use super::model::QueueKind;

#[derive(Error, Debug)]
pub enum QueueError {
    /// A queue object lacks `status`, the requested flavor field, or its name
    #[error("queue '{queue}' is missing field '{field}'")]
    MissingField { queue: String, field: String },

    /// The flavor field exists but does not have the expected shape
    #[error("queue '{queue}' has an invalid '{field}' field: {source}")]
    InvalidField {
        queue: String,
        field: String,
        source: serde_json::Error,
    },

    /// The list response itself could not be decoded or has no `items`
    #[error("malformed {kind} list response: {reason}")]
    MalformedResponse { kind: QueueKind, reason: String },
}

impl QueueError {
    pub fn missing(queue: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            queue: queue.into(),
            field: field.into(),
        }
    }

    pub fn malformed(kind: QueueKind, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, QueueError::MissingField { .. })
    }
}
