//! Server-sent events for a streaming round.
//!
//! | event       | data                                                   |
//! |-------------|--------------------------------------------------------|
//! | `delta`     | `{round, text}`: the whole text accumulated so far     |
//! | `warning`   | `{round, message}`: a streamed record was unusable     |
//! | `completed` | `{round, text, body?, logic_section?}`                 |
//! | `failed`    | `{round, message}`                                     |

use axum::response::sse::Event;
use qchain_application::StreamNotifier;
use qchain_domain::{Round, StreamEvent, split_logic_section};
use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;

/// Encode a round event for the browser.
///
/// Completed questions are split here so the page can show the logic
/// section in its own panel.
pub fn to_sse(round: Round, event: StreamEvent) -> Event {
    let (name, payload) = match event {
        StreamEvent::Delta(text) => ("delta", json!({ "round": round, "text": text })),
        StreamEvent::Warning(message) => {
            ("warning", json!({ "round": round, "message": message }))
        }
        StreamEvent::Completed(text) => match round {
            Round::Questions => {
                let sections = split_logic_section(&text);
                (
                    "completed",
                    json!({
                        "round": round,
                        "text": text,
                        "body": sections.body,
                        "logic_section": sections.logic_section,
                    }),
                )
            }
            Round::Answers => ("completed", json!({ "round": round, "text": text })),
        },
        StreamEvent::Error(message) => ("failed", json!({ "round": round, "message": message })),
    };
    Event::default().event(name).data(payload.to_string())
}

/// Forwards gateway callbacks into the response channel.
pub struct ChannelNotifier {
    tx: UnboundedSender<StreamEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<StreamEvent>) -> Self {
        Self { tx }
    }
}

impl StreamNotifier for ChannelNotifier {
    fn on_delta(&self, accumulated: &str) {
        // A closed channel means the browser went away; the round still finishes.
        let _ = self.tx.send(StreamEvent::Delta(accumulated.to_string()));
    }

    fn on_warning(&self, message: &str) {
        let _ = self.tx.send(StreamEvent::Warning(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_forwards_deltas_and_warnings() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let notifier = ChannelNotifier::new(tx);

        notifier.on_delta("A");
        notifier.on_warning("bad record");
        notifier.on_delta("AB");

        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Delta("A".into()));
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Warning("bad record".into()));
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Delta("AB".into()));
    }

    #[test]
    fn notifier_ignores_closed_channel() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        ChannelNotifier::new(tx).on_delta("still fine");
    }
}
