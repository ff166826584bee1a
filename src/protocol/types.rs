//! Wire types for the `org.imsglobal.lti.*` postMessage protocol.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorBody;

/// Namespace every LTI postMessage subject lives under.
pub const LTI_NAMESPACE: &str = "org.imsglobal.lti.";

pub const SUBJECT_CAPABILITIES: &str = "org.imsglobal.lti.capabilities";
pub const SUBJECT_PUT_DATA: &str = "org.imsglobal.lti.put_data";
pub const SUBJECT_GET_DATA: &str = "org.imsglobal.lti.get_data";

/// Suffix appended to the request subject to form the response subject.
pub const RESPONSE_SUFFIX: &str = ".response";

// ============================================================================
// Subject
// ============================================================================

/// Operations this handler implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Capabilities,
    PutData,
    GetData,
}

impl Subject {
    /// Advertised order for capability discovery.
    pub const ALL: [Subject; 3] = [Subject::Capabilities, Subject::PutData, Subject::GetData];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Capabilities => SUBJECT_CAPABILITIES,
            Subject::PutData => SUBJECT_PUT_DATA,
            Subject::GetData => SUBJECT_GET_DATA,
        }
    }

    /// Short operation name used in error messages (`put_data`, ...).
    pub fn operation(&self) -> &'static str {
        &self.as_str()[LTI_NAMESPACE.len()..]
    }

    pub fn parse(subject: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == subject)
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `subject` belongs to the LTI postMessage namespace.
pub fn is_lti_subject(subject: &str) -> bool {
    subject.starts_with(LTI_NAMESPACE)
}

// ============================================================================
// RequestEnvelope
// ============================================================================

/// Inbound LTI message as posted by the embedded tool.
///
/// Fields are kept loosely typed: `message_id` is echoed back verbatim in
/// whatever JSON form the tool used, and `key` / `value` are validated by the
/// handler so that wrong types can be answered with `bad_request` instead of
/// dropping the message. JSON `null` is normalized to `None` everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RequestEnvelope {
    pub fn new(subject: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            message_id: Some(Value::String(message_id.into())),
            key: None,
            value: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(Value::String(key.into()));
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(Value::String(value.into()));
        self
    }

    /// Read an envelope from a posted JSON object.
    ///
    /// Unknown members are ignored. A non-string `subject` is treated as
    /// missing.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            subject: obj
                .get("subject")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            message_id: non_null(obj.get("message_id")),
            key: non_null(obj.get("key")),
            value: non_null(obj.get("value")),
        }
    }

    /// Subject if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().filter(|s| !s.is_empty())
    }

    /// Correlation id if present. `false` and `""` count as absent.
    pub fn message_id(&self) -> Option<&Value> {
        self.message_id.as_ref().filter(|id| match id {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

// ============================================================================
// ResponseEnvelope
// ============================================================================

/// One entry of the capability discovery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedMessage {
    pub subject: String,
}

/// Body of a response: exactly one of the success shapes or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Capabilities {
        supported_messages: Vec<SupportedMessage>,
    },
    Data {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Error {
        error: ErrorBody,
    },
}

impl ResponsePayload {
    pub fn is_error(&self) -> bool {
        matches!(self, ResponsePayload::Error { .. })
    }
}

/// Outbound message correlated to a request by subject and `message_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub subject: String,
    pub message_id: Value,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl ResponseEnvelope {
    /// Wrap `payload` as the answer to `request_subject`.
    pub fn reply(request_subject: &str, message_id: Value, payload: ResponsePayload) -> Self {
        Self {
            subject: format!("{request_subject}{RESPONSE_SUFFIX}"),
            message_id,
            payload,
        }
    }

    pub fn to_json(&self) -> Value {
        // Plain structs and strings only; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
