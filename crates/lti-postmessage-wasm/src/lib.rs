//! WASM bindings for the LTI postMessage handler.
//!
//! The browser host component listens for `message` events on its window,
//! passes `event.data` and `event.origin` to `LtiPostMessageApi`, and posts
//! any returned response back to `event.source` scoped to `event.origin`.

pub mod api;
mod error;
pub mod sink;

pub use api::LtiPostMessageApi;
pub use sink::JsErrorSink;
