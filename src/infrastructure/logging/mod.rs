//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Level, stream, and format taken from the resolved configuration
//! - JSON or pretty line formatting
//! - `RUST_LOG` directives still override the configured level

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat, LogStream};
pub use logger::LoggerImpl;
