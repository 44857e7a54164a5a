//! Domain layer for question-chain
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Question chain
//!
//! A user supplies a *subject* and a *topic*; the model is asked for a chain of
//! progressively harder, linked questions that ends with an explanation of how
//! the questions connect (the *logic section*).
//!
//! ## Rounds
//!
//! - **Questions round**: compose the chain prompt, stream the reply, split off
//!   the logic section
//! - **Answers round**: feed the full questions text back with the answers prompt

pub mod chain;
pub mod core;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use chain::{
    request::ChainRequest,
    round::Round,
    sections::{LOGIC_SECTION_DELIMITER, SplitResponse, split_logic_section},
};
pub use core::{error::DomainError, model::Model};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Message, Role},
    result::SessionResult,
    stream::StreamEvent,
};
