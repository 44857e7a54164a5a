//! Generate Answers use case.
//!
//! Runs round 2: the full text of the session's current questions is fed
//! back to the model with the answers template.

use crate::config::GenerationParams;
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::progress::StreamNotifier;
use qchain_domain::{DomainError, PromptTemplate, Round, SessionResult};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during the answers round.
#[derive(Error, Debug)]
pub enum GenerateAnswersError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("The model returned an empty response")]
    EmptyResponse,
}

/// Result of a completed answers round.
#[derive(Debug, Clone)]
pub struct GenerateAnswersOutput {
    /// Full answers text, as stored in the session.
    pub text: String,
}

/// Use case for the answers round.
pub struct GenerateAnswersUseCase {
    gateway: Arc<dyn LlmGateway>,
    params: GenerationParams,
}

impl Clone for GenerateAnswersUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            params: self.params.clone(),
        }
    }
}

impl GenerateAnswersUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: GenerationParams) -> Self {
        Self { gateway, params }
    }

    /// Execute the round against the questions currently held in `session`.
    ///
    /// Fails with [`DomainError::NoQuestions`] before any request when the
    /// session has no questions yet. A failed round leaves earlier answers
    /// for the same questions in place.
    pub async fn execute(
        &self,
        session: &mut SessionResult,
        notifier: &dyn StreamNotifier,
    ) -> Result<GenerateAnswersOutput, GenerateAnswersError> {
        let questions = session.require_questions()?.to_string();
        info!(model = %self.params.model, "Starting answers round");

        let prompt = PromptTemplate::answers(&questions);
        let chat = ChatRequest::user(prompt, self.params.clone());

        notifier.on_round_start(Round::Answers);
        let result = self.gateway.stream_chat(&chat, notifier).await;
        notifier.on_round_end(Round::Answers);

        let text = result.inspect_err(|e| {
            error!(class = ?e.class(), "Answers round failed: {}", e);
        })?;
        if text.is_empty() {
            return Err(GenerateAnswersError::EmptyResponse);
        }

        session.store_answers(&questions, text.clone())?;

        info!(chars = text.chars().count(), "Answers round complete");
        Ok(GenerateAnswersOutput { text })
    }
}
