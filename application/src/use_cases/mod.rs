//! Use cases (application services)
//!
//! One use case per generation round.

pub mod generate_answers;
pub mod generate_questions;
