//! Configuration file loading for question-chain
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QCHAIN_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./question-chain.toml` or `./.question-chain.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/question-chain/config.toml`
//! 5. Default values
//!
//! The API key itself is resolved separately, see [`resolve_api_key`].

mod credential;
mod file_config;
mod loader;

pub use credential::{ApiKeySource, ResolvedApiKey, resolve_api_key, resolve_api_key_with};
pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, FileConfig, FileLoggingConfig,
    FileProviderConfig, FileSamplingConfig, FileServerConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
