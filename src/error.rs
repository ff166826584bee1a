use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned to the remote peer inside a response envelope.
///
/// `Display` is the human-readable `message` sent on the wire; `code()` is the
/// machine-readable `code`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("The {operation} request is missing the 'key' field.")]
    MissingKey { operation: &'static str },

    #[error("The {operation} request has a non-string '{field}' field.")]
    InvalidField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("There is no message_id within event.data being sent")]
    MissingMessageId,

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error(
        "For specified origin the combination of key/value pairs have reached or exceeded \
         storage limit of {byte_limit} bytes. The number of keys are {keys} and the number \
         of bytes used are {bytes}"
    )]
    StorageExhaustion {
        byte_limit: i64,
        keys: usize,
        bytes: usize,
    },

    #[error("{subject} is not a supported capability subject")]
    UnsupportedSubject { subject: String },
}

impl ProtocolError {
    /// Wire error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } | Self::InvalidField { .. } | Self::MissingMessageId => {
                "bad_request"
            }
            Self::KeyNotFound { .. } => "key_not_found",
            Self::StorageExhaustion { .. } => "storage_exhaustion",
            Self::UnsupportedSubject { .. } => "unsupported_subject",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serialized `error` member of a failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<ProtocolError> for ErrorBody {
    fn from(err: ProtocolError) -> Self {
        err.to_body()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid handler configuration: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
