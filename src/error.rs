use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvTokenError>;

#[derive(Error, Debug)]
pub enum EnvTokenError {
    // Configuration errors
    #[error("Configuration error: key with name {0} is required")]
    MissingRequiredConfig(String),

    #[error("Configuration error: cannot convert {value} to boolean (INPUT_{key})")]
    InvalidBooleanConfig { key: String, value: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    // Pattern errors
    #[error("Invalid glob pattern {pattern}: {source}")]
    InvalidGlobPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid delimiter pattern: {0}")]
    InvalidDelimiterPattern(#[from] regex::Error),

    // File system errors
    #[error("Traversal error: {0}")]
    TraversalEntry(#[from] walkdir::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Substitution errors
    #[error("Replaceable string {name} found in file {path} but has no corresponding replacement")]
    UnresolvedToken { name: String, path: PathBuf },
}
