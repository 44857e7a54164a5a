//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("No questions have been generated in this session yet")]
    NoQuestions,

    #[error("Answers were generated for questions that are no longer current")]
    StaleAnswers,
}

impl DomainError {
    /// Check if this error is a rejected user input
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::EmptyField(_))
    }
}
