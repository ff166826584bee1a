//! LTI postMessage broker for embedded learning tools.
//!
//! A tool running in an iframe talks to its host page over `window.postMessage`
//! using the `org.imsglobal.lti.*` subjects. This crate validates those
//! messages, serves capability discovery, and backs `put_data` / `get_data`
//! with an in-memory key/value store partitioned by sender origin and bounded
//! by a per-origin quota.
//!
//! Delivering the response back to the sender window is handled by the
//! caller (e.g. the browser host component via `lti-postmessage-wasm`).
//! This crate only produces the response envelope.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod protocol;
pub mod storage;

pub use config::{HandlerConfig, QuotaConfig};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{ConfigError, ErrorBody, ProtocolError};
pub use protocol::{
    FrameResize, HandledMessage, InboundMessage, PostMessageApi, RequestEnvelope,
    ResponseEnvelope, ResponsePayload, Subject, SupportedMessage,
};
pub use storage::{OriginStorage, StorageUsage};
