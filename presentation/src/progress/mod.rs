//! Progress reporting for terminal runs

pub mod reporter;
