//! OpenRouter adapter
//!
//! Implements LlmGateway for the OpenRouter chat-completions endpoint
//! (or any OpenAI-compatible endpoint speaking the same SSE stream).

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod sse;
pub mod transport;
