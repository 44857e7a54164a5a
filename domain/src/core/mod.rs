//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: chat models reachable through the completion endpoint
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
