//! Error handling module for Powerbar.
//!
//! Rendering never fails: segments degrade to invisible instead. The errors
//! here cover the fallible edges around the core, such as reading the
//! configuration file, parsing stdin input and loading theme files.

use std::io;
use thiserror::Error;

/// Unified error type for Powerbar.
#[derive(Error, Debug)]
pub enum PowerbarError {
    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing errors (stdin snapshot)
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Theme lookup or loading errors
    #[error("Theme error: {0}")]
    Theme(String),

    /// Generic operation errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Powerbar operations
pub type Result<T> = std::result::Result<T, PowerbarError>;

impl PowerbarError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        PowerbarError::Config(msg.into())
    }

    /// Create a theme error
    pub fn theme(msg: impl Into<String>) -> Self {
        PowerbarError::Theme(msg.into())
    }

    /// Create a generic other error
    pub fn other(msg: impl Into<String>) -> Self {
        PowerbarError::Other(msg.into())
    }
}

impl From<String> for PowerbarError {
    fn from(s: String) -> Self {
        PowerbarError::Other(s)
    }
}

impl From<&str> for PowerbarError {
    fn from(s: &str) -> Self {
        PowerbarError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PowerbarError::config("bad preset table").to_string(),
            "Configuration error: bad preset table"
        );
        assert_eq!(
            PowerbarError::theme("missing").to_string(),
            "Theme error: missing"
        );
        assert_eq!(PowerbarError::from("plain").to_string(), "plain");
    }

    #[test]
    fn test_io_conversion() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/powerbar/config.toml")?)
        }
        assert!(matches!(read_missing(), Err(PowerbarError::Io(_))));
    }
}
