//! CLI command implementations

pub mod dial;
