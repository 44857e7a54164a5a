//! API key resolution
//!
//! The key is looked up at request time, never at startup: a missing key
//! only fails the round that needs it.

use super::file_config::FileProviderConfig;
use secrecy::SecretString;
use std::env;

/// Where a resolved API key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// The named environment variable
    Environment(String),
    /// The literal `provider.api_key` value
    ConfigFile,
}

impl ApiKeySource {
    pub fn description(&self) -> String {
        match self {
            ApiKeySource::Environment(var) => format!("environment variable {var}"),
            ApiKeySource::ConfigFile => "config file".to_string(),
        }
    }
}

/// An API key together with its origin
pub struct ResolvedApiKey {
    pub key: SecretString,
    pub source: ApiKeySource,
}

/// Resolve the API key from the process environment, then the config file.
pub fn resolve_api_key(config: &FileProviderConfig) -> Option<ResolvedApiKey> {
    resolve_api_key_with(config, |name| env::var(name).ok())
}

/// Resolve the API key with a custom environment lookup.
///
/// Blank values count as absent so an exported-but-empty variable falls
/// through to the config file.
pub fn resolve_api_key_with<F>(config: &FileProviderConfig, lookup: F) -> Option<ResolvedApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(&config.api_key_env).and_then(non_blank) {
        return Some(ResolvedApiKey {
            key: SecretString::from(value),
            source: ApiKeySource::Environment(config.api_key_env.clone()),
        });
    }

    config
        .api_key
        .clone()
        .and_then(non_blank)
        .map(|value| ResolvedApiKey {
            key: SecretString::from(value),
            source: ApiKeySource::ConfigFile,
        })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
