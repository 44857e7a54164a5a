//! Line decoding for the chat-completion event stream.
//!
//! The body arrives in arbitrary byte chunks. [`LineDecoder`] reassembles
//! complete lines (records split across chunks, CRLF endings, multi-byte
//! characters cut in half) and [`parse_line`] classifies each one.

use super::protocol::{DATA_PREFIX, DONE_TOKEN};
use serde_json::Value;

/// Reassembles lines from a chunked byte stream.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns every line it completes, without terminators.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Flush a trailing line left without a terminator at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string())
    }
}

/// Classification of one stream line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Empty line (event separator).
    Blank,
    /// The end-of-stream token.
    Done,
    /// A record's delta content; may be empty.
    Delta(String),
    /// A parsed record without `choices[0].delta`; carries a warning.
    MissingDelta(String),
    /// Not a JSON record (keep-alive comments, garbage).
    Malformed,
}

/// Classify a single line of the stream.
///
/// Every non-empty line is a candidate; a leading `data:` marker is
/// stripped together with surrounding whitespace.
pub fn parse_line(line: &str) -> LineEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineEvent::Blank;
    }

    let payload = trimmed
        .strip_prefix(DATA_PREFIX)
        .map(str::trim)
        .unwrap_or(trimmed);

    if payload == DONE_TOKEN {
        return LineEvent::Done;
    }

    let record: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => return LineEvent::Malformed,
    };

    match record.pointer("/choices/0/delta") {
        Some(delta) => LineEvent::Delta(
            delta
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        ),
        None => LineEvent::MissingDelta(missing_delta_message(&record)),
    }
}

fn missing_delta_message(record: &Value) -> String {
    if let Some(message) = record.pointer("/error/message").and_then(Value::as_str) {
        return format!("Stream reported an error: {message}");
    }
    if record.get("choices").is_none() {
        "Unexpected record format: missing field 'choices'".to_string()
    } else {
        "Unexpected record format: missing field 'delta'".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_splits_complete_lines() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.push(b"a\nb\n\nc"), vec!["a", "b", ""]);
        assert_eq!(decoder.push(b"d\n"), vec!["cd"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn decoder_handles_crlf_and_trailing_line() {
        let mut decoder = LineDecoder::new();
        assert_eq!(decoder.push(b"data: 1\r\ndata: 2\r"), vec!["data: 1"]);
        assert_eq!(decoder.push(b"\n"), vec!["data: 2"]);
        decoder.push(b"tail");
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
    }

    #[test]
    fn decoder_reassembles_split_multibyte_characters() {
        let bytes = "关联\n".as_bytes();
        let mut decoder = LineDecoder::new();
        assert!(decoder.push(&bytes[..2]).is_empty());
        assert_eq!(decoder.push(&bytes[2..]), vec!["关联"]);
    }

    #[test]
    fn blank_lines() {
        assert_eq!(parse_line(""), LineEvent::Blank);
        assert_eq!(parse_line("   "), LineEvent::Blank);
    }

    #[test]
    fn done_token_with_and_without_space() {
        assert_eq!(parse_line("data: [DONE]"), LineEvent::Done);
        assert_eq!(parse_line("data:[DONE]"), LineEvent::Done);
        assert_eq!(parse_line("data: [DONE]  "), LineEvent::Done);
    }

    #[test]
    fn delta_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"关联"}}]}"#;
        assert_eq!(parse_line(line), LineEvent::Delta("关联".to_string()));
    }

    #[test]
    fn unprefixed_record_is_still_a_candidate() {
        let line = r#"{"choices":[{"delta":{"content":"x"}}]}"#;
        assert_eq!(parse_line(line), LineEvent::Delta("x".to_string()));
    }

    #[test]
    fn missing_or_null_content_is_empty_delta() {
        let role_only = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_line(role_only), LineEvent::Delta(String::new()));

        let null_content = r#"data: {"choices":[{"delta":{"content":null}}]}"#;
        assert_eq!(parse_line(null_content), LineEvent::Delta(String::new()));
    }

    #[test]
    fn missing_delta_is_a_warning() {
        let line = r#"data: {"choices":[{"finish_reason":"stop"}]}"#;
        assert_eq!(
            parse_line(line),
            LineEvent::MissingDelta("Unexpected record format: missing field 'delta'".to_string())
        );

        let line = r#"data: {"id":"gen-1"}"#;
        assert!(matches!(parse_line(line), LineEvent::MissingDelta(m) if m.contains("choices")));
    }

    #[test]
    fn error_record_is_a_warning_with_its_message() {
        let line = r#"data: {"error":{"message":"upstream overloaded","code":502}}"#;
        assert_eq!(
            parse_line(line),
            LineEvent::MissingDelta("Stream reported an error: upstream overloaded".to_string())
        );
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse_line(": OPENROUTER PROCESSING"), LineEvent::Malformed);
        assert_eq!(parse_line("data: {not json"), LineEvent::Malformed);
        assert_eq!(parse_line("event: message"), LineEvent::Malformed);
    }
}
