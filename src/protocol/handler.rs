//! PostMessageApi: validates, dispatches and answers LTI postMessage requests.
//!
//! Each request is handled to completion on its own: validate the envelope,
//! dispatch on the subject, wrap the result in a correlated response. Every
//! failure is answered with a structured `error` payload (or silently dropped
//! for uncorrelatable messages); nothing is propagated to the caller.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::HandlerConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::ProtocolError;
use crate::storage::OriginStorage;

use super::dialect::{FrameResize, InboundMessage};
use super::types::{
    is_lti_subject, RequestEnvelope, ResponseEnvelope, ResponsePayload, Subject, SupportedMessage,
};

/// Outcome of a message taken off the window channel.
#[derive(Debug, Clone, PartialEq)]
pub enum HandledMessage {
    /// Response to post back to the sender, scoped to its origin.
    Response(ResponseEnvelope),
    /// Validated resize request for the host component to apply.
    FrameResize(FrameResize),
}

/// LTI postMessage protocol handler. Owns the origin-partitioned storage.
pub struct PostMessageApi {
    storage: OriginStorage,
    sink: Arc<dyn DiagnosticSink>,
}

impl PostMessageApi {
    /// Handler reporting diagnostics through `tracing`.
    pub fn new(config: HandlerConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    pub fn with_sink(config: HandlerConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            storage: OriginStorage::new(config.quota),
            sink,
        }
    }

    pub fn storage(&self) -> &OriginStorage {
        &self.storage
    }

    /// The fixed capability list, in advertised order.
    pub fn capabilities() -> Vec<SupportedMessage> {
        Subject::ALL
            .iter()
            .map(|s| SupportedMessage {
                subject: s.as_str().to_string(),
            })
            .collect()
    }

    /// Entry point for raw window messages: demultiplexes the resize dialect
    /// from LTI requests, then handles the latter.
    pub fn handle_message(&self, data: &Value, origin: &str) -> Option<HandledMessage> {
        match InboundMessage::classify(data)? {
            InboundMessage::FrameResize(resize) => Some(HandledMessage::FrameResize(resize)),
            InboundMessage::Lti(request) => self
                .process_message(&request, origin)
                .map(HandledMessage::Response),
        }
    }

    /// Process one LTI request from `origin`.
    ///
    /// Returns `None` when no response must be sent: missing or foreign
    /// subject, or missing `message_id`.
    pub fn process_message(
        &self,
        request: &RequestEnvelope,
        origin: &str,
    ) -> Option<ResponseEnvelope> {
        let Some(subject) = request.subject().filter(|s| is_lti_subject(s)) else {
            tracing::debug!(origin, "dropping message outside the LTI namespace");
            return None;
        };

        let Some(message_id) = request.message_id() else {
            let body = ProtocolError::MissingMessageId.to_body();
            self.log_error(&json!({ "error": body }).to_string());
            return None;
        };

        let payload = match Subject::parse(subject) {
            Some(Subject::Capabilities) => ResponsePayload::Capabilities {
                supported_messages: Self::capabilities(),
            },
            Some(Subject::PutData) => self.put_data(request, origin),
            Some(Subject::GetData) => self.get_data(request, origin),
            None => self.fail(
                subject,
                ProtocolError::UnsupportedSubject {
                    subject: subject.to_string(),
                },
            ),
        };

        Some(ResponseEnvelope::reply(subject, message_id.clone(), payload))
    }

    fn put_data(&self, request: &RequestEnvelope, origin: &str) -> ResponsePayload {
        let subject = Subject::PutData;
        let (key, value) = match (
            required_key(request, subject),
            optional_string(request.value.as_ref(), subject, "value"),
        ) {
            (Ok(key), Ok(value)) => (key, value),
            (Err(e), _) | (_, Err(e)) => return self.fail(subject.as_str(), e),
        };

        if !self.storage.try_put(origin, &key, value.clone()) {
            self.log_error(&format!("{subject}: reached storage limit"));
            let usage = self.storage.usage(origin);
            return ResponsePayload::Error {
                error: ProtocolError::StorageExhaustion {
                    byte_limit: self.storage.quota().max_bytes,
                    keys: usage.keys,
                    bytes: usage.bytes,
                }
                .into(),
            };
        }

        if self.storage.reached_storage_limit(origin) {
            tracing::warn!(origin, "origin storage reached its quota");
            self.log_error(&format!("{subject}: reached storage limit"));
        }

        ResponsePayload::Data { key, value }
    }

    fn get_data(&self, request: &RequestEnvelope, origin: &str) -> ResponsePayload {
        let subject = Subject::GetData;
        let key = match required_key(request, subject) {
            Ok(key) => key,
            Err(e) => return self.fail(subject.as_str(), e),
        };

        match self.storage.get(origin, &key) {
            Some(value) => ResponsePayload::Data {
                key,
                value: Some(value),
            },
            None => {
                self.log_error(&format!("{subject}: key not found"));
                ResponsePayload::Error {
                    error: ProtocolError::KeyNotFound { key }.into(),
                }
            }
        }
    }

    /// Report `err` on the diagnostic channel and turn it into a payload.
    fn fail(&self, subject: &str, err: ProtocolError) -> ResponsePayload {
        let body = err.to_body();
        self.log_error(&format!("{subject}: {}", json!({ "error": body })));
        ResponsePayload::Error { error: body }
    }

    fn log_error(&self, message: &str) {
        self.sink.log_error(message);
    }
}

impl Default for PostMessageApi {
    fn default() -> Self {
        Self::new(HandlerConfig::default())
    }
}

/// `key` as a non-empty string.
fn required_key(request: &RequestEnvelope, subject: Subject) -> Result<String, ProtocolError> {
    match optional_string(request.key.as_ref(), subject, "key")? {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ProtocolError::MissingKey {
            operation: subject.operation(),
        }),
    }
}

fn optional_string(
    field: Option<&Value>,
    subject: Subject,
    name: &'static str,
) -> Result<Option<String>, ProtocolError> {
    match field {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ProtocolError::InvalidField {
            operation: subject.operation(),
            field: name,
        }),
    }
}
