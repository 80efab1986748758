//! Error types for the schema downloader

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema download errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern/version mismatch: {patterns} patterns but {versions} versions")]
    PatternVersionMismatch { patterns: usize, versions: usize },

    #[error("Invalid schema type: {0} (expected AVRO or PROTOCOL_BUFFER)")]
    InvalidSchemaType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Output path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Unsupported schema type for {name}: no file extension for {schema_type}")]
    UnsupportedSchemaType { name: String, schema_type: String },

    #[error("Schema registry error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Schema service client is closed")]
    ClientClosed,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// Whether this error comes from user configuration rather than the
    /// registry or the filesystem
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SchemaError::InvalidPattern { .. }
                | SchemaError::PatternVersionMismatch { .. }
                | SchemaError::InvalidSchemaType(_)
                | SchemaError::InvalidConfig(_)
                | SchemaError::NotADirectory(_)
                | SchemaError::Config(_)
        )
    }

    /// Whether this error was raised while talking to the registry
    pub fn is_remote(&self) -> bool {
        matches!(self, SchemaError::Remote { .. } | SchemaError::Http(_))
    }
}
