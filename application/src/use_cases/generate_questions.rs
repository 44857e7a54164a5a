//! Generate Questions use case.
//!
//! Runs round 1: compose the question-chain prompt from a validated
//! [`ChainRequest`], stream the reply into the session and split off the
//! logic section.

use crate::config::GenerationParams;
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::progress::StreamNotifier;
use qchain_domain::util::truncate_str;
use qchain_domain::{
    ChainRequest, PromptTemplate, Round, SessionResult, SplitResponse, split_logic_section,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during the questions round.
#[derive(Error, Debug)]
pub enum GenerateQuestionsError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("The model returned an empty response")]
    EmptyResponse,
}

/// Result of a completed questions round.
#[derive(Debug, Clone)]
pub struct GenerateQuestionsOutput {
    /// Full reply text, as stored in the session.
    pub text: String,
    /// The reply split into questions body and logic section.
    pub sections: SplitResponse,
}

/// Use case for the questions round.
///
/// 1. Clear the session (questions *and* answers)
/// 2. Compose the prompt and stream the reply through the gateway
/// 3. Store the reply and split off the logic section
pub struct GenerateQuestionsUseCase {
    gateway: Arc<dyn LlmGateway>,
    params: GenerationParams,
}

impl Clone for GenerateQuestionsUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            params: self.params.clone(),
        }
    }
}

impl GenerateQuestionsUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, params: GenerationParams) -> Self {
        Self { gateway, params }
    }

    /// Execute the round, reporting deltas to `notifier`.
    pub async fn execute(
        &self,
        request: &ChainRequest,
        session: &mut SessionResult,
        notifier: &dyn StreamNotifier,
    ) -> Result<GenerateQuestionsOutput, GenerateQuestionsError> {
        info!(
            subject = truncate_str(request.subject(), 80),
            topic = truncate_str(request.topic(), 80),
            model = %self.params.model,
            "Starting questions round"
        );

        session.begin_questions_round();

        let prompt = PromptTemplate::question_chain(request);
        let chat = ChatRequest::user(prompt, self.params.clone());

        notifier.on_round_start(Round::Questions);
        let result = self.gateway.stream_chat(&chat, notifier).await;
        notifier.on_round_end(Round::Questions);

        let text = result.inspect_err(|e| {
            error!(class = ?e.class(), "Questions round failed: {}", e);
        })?;
        if text.is_empty() {
            return Err(GenerateQuestionsError::EmptyResponse);
        }

        let sections = split_logic_section(&text);
        if !sections.has_logic_section() {
            info!("Reply has no logic section");
        }
        session.store_questions(text.clone());

        info!(chars = text.chars().count(), "Questions round complete");
        Ok(GenerateQuestionsOutput { text, sections })
    }
}
