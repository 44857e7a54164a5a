//! Generation parameters: what every chat request carries besides the prompt.
//!
//! [`GenerationParams`] groups the model identifier, the optional sampling
//! parameters and the web-search toggle. These are application-layer
//! concerns; the wire encoding lives in the infrastructure adapter.

use qchain_domain::Model;
use serde::{Deserialize, Serialize};

/// Model and sampling settings for one round.
///
/// Sampling fields left as `None` are omitted from the request so the
/// backend default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model identifier.
    pub model: Model,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum number of output tokens.
    pub max_tokens: Option<u32>,
    /// Nucleus-sampling probability mass.
    pub top_p: Option<f32>,
    /// Ask the backend to augment the reply with web search results.
    pub web_search: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: Some(0.7),
            max_tokens: Some(2000),
            top_p: Some(1.0),
            web_search: false,
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GenerationParams::default();
        assert_eq!(params.model, Model::Gpt4o);
        assert_eq!(params.temperature, Some(0.7));
        assert_eq!(params.max_tokens, Some(2000));
        assert_eq!(params.top_p, Some(1.0));
        assert!(!params.web_search);
    }

    #[test]
    fn test_builder_chain() {
        let params = GenerationParams::default()
            .with_model(Model::ClaudeSonnet45)
            .with_temperature(None)
            .with_max_tokens(Some(512))
            .with_web_search(true);
        assert_eq!(params.model, Model::ClaudeSonnet45);
        assert_eq!(params.temperature, None);
        assert_eq!(params.max_tokens, Some(512));
        assert!(params.web_search);
    }
}
