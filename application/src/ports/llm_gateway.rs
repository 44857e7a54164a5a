//! LLM Gateway port
//!
//! Defines the interface for streaming a chat completion from an LLM provider.

use crate::config::GenerationParams;
use crate::ports::progress::StreamNotifier;
use async_trait::async_trait;
use qchain_domain::{Message, Model};
use std::time::Duration;
use thiserror::Error;

/// Broad class of a [`GatewayError`], used to phrase the failure for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing or unusable local configuration; nothing was sent.
    Configuration,
    /// Timeout, refused connection, or a connection lost mid-stream.
    Network,
    /// The backend answered with a non-success status.
    Protocol,
}

/// Errors that can occur during LLM gateway operations
///
/// Every variant aborts the round; the partially accumulated text is dropped.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: no API key configured (set {0})")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no error details"))]
    HttpStatus { status: u16, detail: Option<String> },
}

impl GatewayError {
    pub fn class(&self) -> ErrorClass {
        match self {
            GatewayError::MissingCredential(_) | GatewayError::InvalidConfiguration(_) => {
                ErrorClass::Configuration
            }
            GatewayError::Timeout(_) | GatewayError::ConnectionError(_) => ErrorClass::Network,
            GatewayError::HttpStatus { .. } => ErrorClass::Protocol,
        }
    }
}

/// A single-prompt streaming chat request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub params: GenerationParams,
}

impl ChatRequest {
    /// One user message with the given generation parameters.
    pub fn user(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            params,
        }
    }

    pub fn model(&self) -> &Model {
        &self.params.model
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer streams a completion.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Stream a chat completion.
    ///
    /// `notifier` receives the full accumulated text after every non-empty
    /// delta and a warning for every record it could not use. Returns the
    /// final text when the stream ends normally. Errors discard the partial
    /// text; no notifier call happens after an error is decided.
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        notifier: &dyn StreamNotifier,
    ) -> Result<String, GatewayError>;
}
