//! Streaming events for a generation round.
//!
//! [`StreamEvent`] represents individual events of a round as they are
//! forwarded to a display surface, enabling real-time rendering of model
//! output as it is generated.

/// An event in a streaming round.
///
/// `Delta` always carries the *whole* text accumulated so far, so a surface
/// can re-render the message instead of appending fragments itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The accumulated text after a new delta arrived.
    Delta(String),
    /// A non-fatal problem with one streamed record.
    Warning(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that ended the round.
    Error(String),
}
