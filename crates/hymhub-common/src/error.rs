//! Error types for HymHub

use thiserror::Error;

/// Result type alias for HymHub operations
pub type Result<T> = std::result::Result<T, HymError>;

/// Main error type for HymHub
///
/// Every variant is fatal: the pipeline aborts the whole run instead of
/// skipping a species or a record.
#[derive(Error, Debug)]
pub enum HymError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or malformed species configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An identifier that must resolve through a mapping table did not
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Malformed line in an input table
    #[error("Parse error in {file} line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    /// Remote server answered with a failure status
    #[error("Network error: {0}")]
    Network(String),
}

impl HymError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error pointing at a line of an input file
    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}
