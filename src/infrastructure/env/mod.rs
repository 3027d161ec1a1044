//! Environment snapshot captured once per resolution pass

pub mod source;

pub use source::EnvironmentSource;
