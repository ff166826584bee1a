pub mod dialect;
pub mod handler;
pub mod types;

pub use dialect::{FrameResize, InboundMessage};
pub use handler::{HandledMessage, PostMessageApi};
pub use types::{RequestEnvelope, ResponseEnvelope, ResponsePayload, Subject, SupportedMessage};
