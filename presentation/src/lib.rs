//! Presentation layer for question-chain
//!
//! This crate contains CLI definitions, terminal output and progress
//! reporting, and the web UI.

pub mod cli;
pub mod output;
pub mod progress;
pub mod web;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::{ChainReport, ConsoleFormatter};
pub use progress::reporter::{SimpleProgress, TerminalReporter};
pub use web::{AppState, router, spawn_idle_sweeper};
