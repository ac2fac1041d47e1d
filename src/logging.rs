//! Log sink abstraction for credential retrieval.
//!
//! Retrievers report why a strategy did or did not yield a credential as
//! plain leveled text. The sink is injected so embedding applications can
//! route these lines into their own diagnostics.

/// Destination for retrieval diagnostics.
pub trait LogSink: Send + Sync {
    /// Informational message (a strategy was checked, applied, or skipped).
    fn info(&self, message: &str);

    /// Warning message (an inferred helper is missing from the system).
    fn warn(&self, message: &str);
}

/// Default sink forwarding to the `tracing` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}
