//! Stream notification port
//!
//! Defines the interface for reporting a round's streaming progress.

use qchain_domain::Round;

/// Callback for progress updates while a round streams
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (terminal, web UI, etc.)
pub trait StreamNotifier: Send + Sync {
    /// Called when a round starts, before the request is sent.
    fn on_round_start(&self, _round: Round) {}

    /// Called after each non-empty delta with the full text accumulated so far.
    fn on_delta(&self, accumulated: &str);

    /// Called for a streamed record that could not be used; the stream goes on.
    fn on_warning(&self, _message: &str) {}

    /// Called when a round ends, successfully or not.
    fn on_round_end(&self, _round: Round) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoProgress;

impl StreamNotifier for NoProgress {
    fn on_delta(&self, _accumulated: &str) {}
}
