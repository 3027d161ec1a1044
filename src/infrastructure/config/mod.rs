//! Configuration management infrastructure
//!
//! Turns the process environment into the typed service configuration:
//! - Environment snapshot capture
//! - Schema resolution with aggregated errors
//! - Projection into nested config structs
//! - Atomic snapshot replacement on reload

pub mod handle;
pub mod loader;

pub use handle::ConfigHandle;
pub use loader::ConfigLoader;
