//! Demultiplexing of the two message dialects sharing the window channel.
//!
//! Older tools post a JSON-encoded *string* to request an iframe resize
//! (`{"subject":"lti.frameResize","height":800}`); LTI postMessage requests
//! are posted as structured objects. The dialect is chosen by payload shape
//! before any parsing happens.

use serde_json::Value;

use super::types::RequestEnvelope;

/// Subject of the legacy resize dialect.
pub const FRAME_RESIZE_SUBJECT: &str = "lti.frameResize";

/// Largest accepted iframe height in CSS pixels.
pub const MAX_FRAME_HEIGHT: f64 = 10000.0;

/// Validated resize request. Applying it is up to the host component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResize {
    pub height: u32,
}

/// A message recognized on the window channel.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Structured LTI postMessage request.
    Lti(RequestEnvelope),
    /// Legacy string-encoded resize request.
    FrameResize(FrameResize),
}

impl InboundMessage {
    /// Classify posted `data` by shape.
    ///
    /// Returns `None` for payloads neither dialect accepts (null, numbers,
    /// arrays, strings that are not a valid resize request).
    pub fn classify(data: &Value) -> Option<Self> {
        match data {
            Value::Object(obj) => Some(Self::Lti(RequestEnvelope::from_object(obj))),
            Value::String(text) => parse_frame_resize(text).map(Self::FrameResize),
            _ => None,
        }
    }
}

/// Parse a string-dialect message. Only `lti.frameResize` with a height in
/// `1..=MAX_FRAME_HEIGHT` is accepted.
pub fn parse_frame_resize(text: &str) -> Option<FrameResize> {
    let params: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("ignoring non-JSON string message: {e}");
            return None;
        }
    };

    if params.get("subject").and_then(|s| s.as_str()) != Some(FRAME_RESIZE_SUBJECT) {
        return None;
    }

    let height = params.get("height").and_then(|h| match h {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    });

    match height {
        Some(h) if h.is_finite() && (1.0..=MAX_FRAME_HEIGHT).contains(&h) => Some(FrameResize {
            height: h.round() as u32,
        }),
        _ => {
            tracing::warn!("Invalid height value received, aborting");
            None
        }
    }
}
