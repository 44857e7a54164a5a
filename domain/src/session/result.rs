//! Per-session generation results

use crate::chain::sections::{SplitResponse, split_logic_section};
use crate::core::error::DomainError;
use serde::Serialize;

/// Questions and answers held for one user session (Entity)
///
/// Starts empty. A new questions round clears both fields before streaming,
/// so answers from an earlier chain can never sit next to a newer one.
/// Answers are only accepted for the questions text they were generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    questions_text: Option<String>,
    answers_text: Option<String>,
}

impl SessionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions_text(&self) -> Option<&str> {
        self.questions_text.as_deref()
    }

    pub fn answers_text(&self) -> Option<&str> {
        self.answers_text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.questions_text.is_none() && self.answers_text.is_none()
    }

    /// Drop everything from previous rounds; called when a questions round starts.
    pub fn begin_questions_round(&mut self) {
        self.questions_text = None;
        self.answers_text = None;
    }

    /// Store a completed questions reply. Any answers are discarded.
    pub fn store_questions(&mut self, text: impl Into<String>) {
        self.questions_text = Some(text.into());
        self.answers_text = None;
    }

    /// The current questions text, or [`DomainError::NoQuestions`].
    pub fn require_questions(&self) -> Result<&str, DomainError> {
        self.questions_text().ok_or(DomainError::NoQuestions)
    }

    /// Store a completed answers reply generated from `source_questions`.
    ///
    /// Rejected unless `source_questions` is the questions text currently held.
    pub fn store_answers(
        &mut self,
        source_questions: &str,
        text: impl Into<String>,
    ) -> Result<(), DomainError> {
        match self.questions_text.as_deref() {
            None => Err(DomainError::NoQuestions),
            Some(current) if current != source_questions => Err(DomainError::StaleAnswers),
            Some(_) => {
                self.answers_text = Some(text.into());
                Ok(())
            }
        }
    }

    /// The current questions text split into body and logic section.
    pub fn questions_split(&self) -> Option<SplitResponse> {
        self.questions_text().map(split_logic_section)
    }
}
