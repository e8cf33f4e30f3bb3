//! Application glue module
//!
//! Configuration and application-level utilities.

mod config;

pub use config::{ConfigError, InputConfig};
