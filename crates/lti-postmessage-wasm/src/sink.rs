//! Diagnostic sink backed by a JS `logError(message)` function.

use lti_postmessage::DiagnosticSink;
use wasm_bindgen::JsValue;

/// Forwards diagnostics to a JS callback, or to `console.error` when none is
/// supplied. Exceptions thrown by the callback are swallowed.
pub struct JsErrorSink {
    callback: Option<js_sys::Function>,
}

// SAFETY: WASM is single-threaded.
unsafe impl Send for JsErrorSink {}
unsafe impl Sync for JsErrorSink {}

impl JsErrorSink {
    pub fn new(callback: Option<js_sys::Function>) -> Self {
        Self { callback }
    }
}

impl DiagnosticSink for JsErrorSink {
    fn log_error(&self, message: &str) {
        let message = JsValue::from_str(message);
        match &self.callback {
            Some(f) => {
                let _ = f.call1(&JsValue::NULL, &message);
            }
            None => web_sys::console::error_1(&message),
        }
    }
}
