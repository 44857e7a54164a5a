//! Prompt domain
//!
//! Fixed templates for the questions round and the answers round.

mod template;

pub use template::PromptTemplate;
