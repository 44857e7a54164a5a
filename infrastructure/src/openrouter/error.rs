//! Error types for the OpenRouter adapter

use qchain_application::GatewayError;
use thiserror::Error;

/// Errors raised while setting up the OpenRouter adapter
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl From<OpenRouterError> for GatewayError {
    fn from(error: OpenRouterError) -> Self {
        GatewayError::InvalidConfiguration(error.to_string())
    }
}
