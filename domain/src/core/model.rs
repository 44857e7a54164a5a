//! Model value object representing a chat-completion model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models reachable through the OpenRouter chat-completion endpoint (Value Object)
///
/// Identifiers follow the `vendor/name` convention of the router. Anything
/// not listed here is carried verbatim as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Model {
    // OpenAI models
    #[default]
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    // Anthropic models
    ClaudeSonnet45,
    ClaudeHaiku45,
    // Google models
    Gemini25Pro,
    Gemini25Flash,
    // DeepSeek models
    DeepSeekChat,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "openai/gpt-4o",
            Model::Gpt4oMini => "openai/gpt-4o-mini",
            Model::Gpt41 => "openai/gpt-4.1",
            Model::ClaudeSonnet45 => "anthropic/claude-sonnet-4.5",
            Model::ClaudeHaiku45 => "anthropic/claude-haiku-4.5",
            Model::Gemini25Pro => "google/gemini-2.5-pro",
            Model::Gemini25Flash => "google/gemini-2.5-flash",
            Model::DeepSeekChat => "deepseek/deepseek-chat",
            Model::Custom(s) => s,
        }
    }

    /// True when the identifier is blank
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "openai/gpt-4o" => Model::Gpt4o,
            "openai/gpt-4o-mini" => Model::Gpt4oMini,
            "openai/gpt-4.1" => Model::Gpt41,
            "anthropic/claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "anthropic/claude-haiku-4.5" => Model::ClaudeHaiku45,
            "google/gemini-2.5-pro" => Model::Gemini25Pro,
            "google/gemini-2.5-flash" => Model::Gemini25Flash,
            "deepseek/deepseek-chat" => Model::DeepSeekChat,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
