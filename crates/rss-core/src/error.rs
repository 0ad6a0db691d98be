//! # Error Hierarchy
//!
//! Structured error types for the foundational layer, built with `thiserror`.
//! Each variant carries the offending value so operators can fix the
//! configuration that produced it.

use thiserror::Error;

/// Domain primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A status name was empty or whitespace only.
    #[error("status name must not be empty")]
    EmptyStatus,

    /// The configured vocabulary lists no status at all.
    #[error("status vocabulary must contain at least one status")]
    EmptyVocabulary,

    /// A status appears more than once in the configured vocabulary.
    #[error("status {0:?} appears more than once in the vocabulary")]
    DuplicateStatus(String),

    /// A sentinel outcome was listed as a configured status.
    #[error("sentinel status {0:?} cannot be part of the configured vocabulary")]
    SentinelInVocabulary(String),

    /// An element family name is not one of Site, Resource, Node.
    #[error("unknown element family {0:?} (expected Site, Resource or Node)")]
    UnknownElementFamily(String),
}

/// Errors while loading or reading status configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document parsed but describes an invalid vocabulary.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// The configuration backend could not answer.
    #[error("configuration unavailable: {0}")]
    Unavailable(String),
}
