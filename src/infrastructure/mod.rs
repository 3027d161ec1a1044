//! Infrastructure layer module
//!
//! Everything that touches process-global state:
//! - Environment snapshot capture
//! - Configuration loading and reload
//! - Logging initialization

pub mod config;
pub mod env;
pub mod logging;
