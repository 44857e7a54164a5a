//! Application layer for question-chain
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    llm_gateway::{ChatRequest, ErrorClass, GatewayError, LlmGateway},
    progress::{NoProgress, StreamNotifier},
};
pub use use_cases::generate_answers::{
    GenerateAnswersError, GenerateAnswersOutput, GenerateAnswersUseCase,
};
pub use use_cases::generate_questions::{
    GenerateQuestionsError, GenerateQuestionsOutput, GenerateQuestionsUseCase,
};
