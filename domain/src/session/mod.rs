//! Session domain.
//!
//! - [`entities::Message`]: a single chat message sent to the model
//! - [`result::SessionResult`]: the questions and answers held for one user session
//! - [`stream::StreamEvent`]: progress events of a streaming round

pub mod entities;
pub mod result;
pub mod stream;
