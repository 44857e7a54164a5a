//! Question-chain domain.
//!
//! - [`request::ChainRequest`]: validated subject and topic for a questions round
//! - [`round::Round`]: which of the two generation rounds is running
//! - [`sections::split_logic_section`]: separates the logic explanation from the questions

pub mod request;
pub mod round;
pub mod sections;
