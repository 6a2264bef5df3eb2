//! Logging setup shared by the workspace binaries.
pub mod config;
pub mod tracing;

pub use config::Config;
