//! Configuration module.
//!
//! Handles loading and validating authentication configuration from TOML
//! files.

mod settings;

pub use settings::*;
