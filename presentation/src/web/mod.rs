//! Web UI: one page plus a small JSON/SSE API.
//!
//! Each browser tab holds a session id; rounds stream back as
//! server-sent events and their results are kept per session so the page
//! can be reloaded without losing them.

pub mod events;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, SessionStore, spawn_idle_sweeper};
