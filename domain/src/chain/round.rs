//! Generation round value object

use serde::{Deserialize, Serialize};

/// One of the two generation rounds of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    /// Round 1: generate the question chain
    Questions,
    /// Round 2: answer the current question chain
    Answers,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Questions => "questions",
            Round::Answers => "answers",
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
