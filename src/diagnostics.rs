//! Diagnostic side-channel for protocol error conditions.
//!
//! Reporting is fire-and-forget: a sink never influences the response that is
//! sent to the peer.

/// Consumer of diagnostic error reports (the host's `logError`).
pub trait DiagnosticSink: Send + Sync {
    fn log_error(&self, message: &str);
}

/// Default sink: forwards reports to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log_error(&self, message: &str) {
        tracing::error!(target: "lti_postmessage", "{message}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log_error(&self, message: &str) {
        self(message)
    }
}
