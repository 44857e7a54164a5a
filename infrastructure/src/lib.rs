//! Infrastructure layer for question-chain
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenRouter streaming gateway and
//! configuration file loading.

pub mod config;
pub mod openrouter;

// Re-export commonly used types
pub use config::{
    ApiKeySource, ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig,
    FileProviderConfig, FileSamplingConfig, FileServerConfig, resolve_api_key,
};
pub use openrouter::{
    error::OpenRouterError,
    gateway::{OpenRouterGateway, OpenRouterSettings},
    transport::{HttpTransport, ReqwestTransport},
};
