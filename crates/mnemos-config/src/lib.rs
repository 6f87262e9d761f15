//! Configuration models and file loading for the memory engine.
//!
//! This crate owns the Mnemos config schema, its defaults, and the loader
//! used by binaries and demos to read a config file from disk.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading APIs.
pub use error::ConfigError;
/// Config file loading helper.
pub use loader::load_config;
/// Configuration schema models.
pub use model::*;
