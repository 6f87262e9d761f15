//! Error types for config loading.

/// Errors returned by config loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while reading a config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Config file failed to parse.
    #[error("parse error: {0}")]
    Parse(String),
}
