//! Error types for the peerauth library.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
