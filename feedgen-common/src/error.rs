//! Common error types for feedgen

use thiserror::Error;

/// Common result type for feedgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the binary
#[derive(Error, Debug)]
pub enum Error {
    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
