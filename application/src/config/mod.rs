//! Application-level configuration.
//!
//! - [`GenerationParams`]: model and sampling settings sent with every round

pub mod generation_params;

pub use generation_params::GenerationParams;
