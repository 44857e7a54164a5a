//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use qchain_application::GenerationParams;
use qchain_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default chat-completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default name of the environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("provider.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("provider.connect_timeout_seconds cannot be 0")]
    InvalidConnectTimeout,

    #[error("provider.model cannot be empty")]
    EmptyModelName,

    #[error("provider.endpoint must be an http(s) URL, got {0:?}")]
    InvalidEndpoint(String),

    #[error("sampling.temperature must be within 0.0..=2.0, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("sampling.top_p must be within 0.0..=1.0, got {0}")]
    TopPOutOfRange(f32),

    #[error("sampling.max_tokens cannot be 0")]
    InvalidMaxTokens,

    #[error("server.session_idle_minutes cannot be 0")]
    InvalidIdleTimeout,
}

/// Raw provider configuration from TOML (`[provider]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Chat-completion endpoint URL
    pub endpoint: String,
    /// Model identifier, e.g. "openai/gpt-4o"
    pub model: Model,
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY")
    pub api_key_env: String,
    /// Direct API key (not recommended: use env var instead)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Sent as `HTTP-Referer` for the router's app attribution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Sent as `X-Title` for the router's app attribution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    /// Longest silence tolerated while waiting for the response or the next chunk
    pub timeout_seconds: u64,
    /// Upper bound for establishing the connection
    pub connect_timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: Model::default(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
            site_url: None,
            site_name: None,
            timeout_seconds: 120,
            connect_timeout_seconds: 10,
        }
    }
}

/// Raw sampling configuration from TOML (`[sampling]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSamplingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Enable the router's web-search plugin
    pub web_search: bool,
}

impl Default for FileSamplingConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            web_search: params.web_search,
        }
    }
}

/// Raw web server configuration from TOML (`[server]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Socket address the web UI listens on
    pub bind: String,
    /// Sessions idle for longer than this are dropped
    pub session_idle_minutes: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            session_idle_minutes: 60,
        }
    }
}

/// Raw logging configuration from TOML (`[logging]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for a daily-rolling log file; console only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat-completion backend settings
    pub provider: FileProviderConfig,
    /// Sampling parameters sent with every request
    pub sampling: FileSamplingConfig,
    /// Web UI settings
    pub server: FileServerConfig,
    /// Log output settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let provider = &self.provider;
        if provider.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if provider.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidConnectTimeout);
        }
        if provider.model.is_blank() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        let endpoint = provider.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidEndpoint(
                provider.endpoint.clone(),
            ));
        }

        let sampling = &self.sampling;
        if let Some(t) = sampling.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigValidationError::TemperatureOutOfRange(t));
        }
        if let Some(p) = sampling.top_p
            && !(0.0..=1.0).contains(&p)
        {
            return Err(ConfigValidationError::TopPOutOfRange(p));
        }
        if sampling.max_tokens == Some(0) {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }

        if self.server.session_idle_minutes == 0 {
            return Err(ConfigValidationError::InvalidIdleTimeout);
        }

        Ok(())
    }

    /// Generation parameters for the use cases
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams::default()
            .with_model(self.provider.model.clone())
            .with_temperature(self.sampling.temperature)
            .with_max_tokens(self.sampling.max_tokens)
            .with_top_p(self.sampling.top_p)
            .with_web_search(self.sampling.web_search)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.connect_timeout_seconds)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.session_idle_minutes * 60)
    }

    /// Copy with any literal API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.provider.api_key.is_some() {
            copy.provider.api_key = Some("<redacted>".to_string());
        }
        copy
    }
}
