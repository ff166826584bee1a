//! LtiPostMessageApi: the WASM-exposed handler class.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use lti_postmessage::{HandledMessage, HandlerConfig, PostMessageApi, ResponseEnvelope};

use crate::error::{to_js_error, to_js_value};
use crate::sink::JsErrorSink;

/// Shape returned by `handleMessage`.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum JsHandled<'a> {
    Response { message: &'a ResponseEnvelope },
    FrameResize { height: u32 },
}

/// LTI postMessage handler exposed to the host page.
#[wasm_bindgen]
pub struct LtiPostMessageApi {
    inner: PostMessageApi,
}

#[wasm_bindgen]
impl LtiPostMessageApi {
    /// Create a handler.
    ///
    /// `options` is an optional `{ quota: { enabled, maxBytes, maxKeys } }`
    /// object; omitted fields take their defaults. `log_error` receives
    /// diagnostic messages (default: `console.error`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        options: JsValue,
        log_error: Option<js_sys::Function>,
    ) -> Result<LtiPostMessageApi, JsValue> {
        console_error_panic_hook::set_once();

        let config = if options.is_undefined() || options.is_null() {
            HandlerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };

        Ok(Self {
            inner: PostMessageApi::with_sink(config, Arc::new(JsErrorSink::new(log_error))),
        })
    }

    /// Create a handler from the host's storage-limit feature flag alone.
    #[wasm_bindgen(js_name = "fromStorageLimitFlag")]
    pub fn from_storage_limit_flag(
        check_storage_limit: bool,
        log_error: Option<js_sys::Function>,
    ) -> LtiPostMessageApi {
        console_error_panic_hook::set_once();
        Self {
            inner: PostMessageApi::with_sink(
                HandlerConfig::with_storage_limit_flag(check_storage_limit),
                Arc::new(JsErrorSink::new(log_error)),
            ),
        }
    }

    /// Handle an LTI request object. Returns the response to post back to
    /// `origin`, or `null` when nothing must be sent.
    #[wasm_bindgen(js_name = "processMessage")]
    pub fn process_message(&self, data: JsValue, origin: &str) -> Result<JsValue, JsValue> {
        let Some(Value::Object(obj)) = read_data(data) else {
            return Ok(JsValue::NULL);
        };
        let request = lti_postmessage::RequestEnvelope::from_object(&obj);
        match self.inner.process_message(&request, origin) {
            Some(response) => to_js_value(&response),
            None => Ok(JsValue::NULL),
        }
    }

    /// Handle raw `event.data` of either dialect.
    ///
    /// Returns `{ type: "response", message }`, `{ type: "frameResize", height }`
    /// or `null`.
    #[wasm_bindgen(js_name = "handleMessage")]
    pub fn handle_message(&self, data: JsValue, origin: &str) -> Result<JsValue, JsValue> {
        let Some(data) = read_data(data) else {
            return Ok(JsValue::NULL);
        };
        match self.inner.handle_message(&data, origin) {
            Some(HandledMessage::Response(response)) => to_js_value(&JsHandled::Response {
                message: &response,
            }),
            Some(HandledMessage::FrameResize(resize)) => to_js_value(&JsHandled::FrameResize {
                height: resize.height,
            }),
            None => Ok(JsValue::NULL),
        }
    }

    /// The supported message list advertised by capability discovery.
    pub fn capabilities() -> Result<JsValue, JsValue> {
        to_js_value(&PostMessageApi::capabilities())
    }

    /// Whether `origin` is at or over its storage quota.
    #[wasm_bindgen(js_name = "reachedStorageLimit")]
    pub fn reached_storage_limit(&self, origin: &str) -> bool {
        self.inner.storage().reached_storage_limit(origin)
    }
}

/// Convert `event.data` to JSON. Values that cannot be represented (functions,
/// DOM nodes, ...) are treated as foreign messages.
fn read_data(data: JsValue) -> Option<Value> {
    if data.is_undefined() || data.is_null() {
        return None;
    }
    serde_wasm_bindgen::from_value(data).ok()
}
