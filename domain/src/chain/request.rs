//! Chain request value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Subject and topic for one questions round (Value Object)
///
/// Both fields are guaranteed non-blank. The text is kept exactly as typed;
/// it is substituted verbatim into the prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRequest {
    subject: String,
    topic: String,
}

impl ChainRequest {
    /// Validate user input, rejecting a blank subject or topic.
    pub fn try_new(
        subject: impl Into<String>,
        topic: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let subject = subject.into();
        let topic = topic.into();
        if subject.trim().is_empty() {
            return Err(DomainError::EmptyField("subject"));
        }
        if topic.trim().is_empty() {
            return Err(DomainError::EmptyField("topic"));
        }
        Ok(Self { subject, topic })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let request = ChainRequest::try_new("高中物理", "凸透镜成像规律").unwrap();
        assert_eq!(request.subject(), "高中物理");
        assert_eq!(request.topic(), "凸透镜成像规律");
    }

    #[test]
    fn test_empty_subject_rejected() {
        assert_eq!(
            ChainRequest::try_new("", "topic"),
            Err(DomainError::EmptyField("subject"))
        );
        assert_eq!(
            ChainRequest::try_new("   ", "topic"),
            Err(DomainError::EmptyField("subject"))
        );
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert_eq!(
            ChainRequest::try_new("subject", "\n"),
            Err(DomainError::EmptyField("topic"))
        );
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let request = ChainRequest::try_new(" Math ", "Limits ").unwrap();
        assert_eq!(request.subject(), " Math ");
        assert_eq!(request.topic(), "Limits ");
    }
}
