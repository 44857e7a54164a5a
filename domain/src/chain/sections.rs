//! Logic-section extraction from a finished questions reply.
//!
//! The questions prompt asks the model to close with a paragraph headed by
//! [`LOGIC_SECTION_DELIMITER`]. Everything from the first occurrence of that
//! marker onwards is the logic section; the text before it is the body.

use serde::{Deserialize, Serialize};

/// Heading that opens the logic explanation ("associative logic explanation:").
pub const LOGIC_SECTION_DELIMITER: &str = "关联逻辑说明：";

/// A reply split into its question body and optional logic section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResponse {
    /// Text before the delimiter, or the whole reply when it is absent.
    pub body: String,
    /// The delimiter and everything after it.
    pub logic_section: Option<String>,
}

impl SplitResponse {
    /// Whether the delimiter was found.
    pub fn has_logic_section(&self) -> bool {
        self.logic_section.is_some()
    }
}

/// Split `full_text` at the first occurrence of [`LOGIC_SECTION_DELIMITER`].
///
/// The delimiter stays at the start of the logic section. Later occurrences
/// are part of the logic section, never a second split point.
pub fn split_logic_section(full_text: &str) -> SplitResponse {
    match full_text.find(LOGIC_SECTION_DELIMITER) {
        Some(index) => SplitResponse {
            body: full_text[..index].to_string(),
            logic_section: Some(full_text[index..].to_string()),
        },
        None => SplitResponse {
            body: full_text.to_string(),
            logic_section: None,
        },
    }
}
