//! Error types for loading and querying stub snapshots.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stubs root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("No stub snapshots found under {root}")]
    NoSnapshots { root: PathBuf },

    #[error("Unknown snapshot '{tag}' (available: {available})")]
    UnknownSnapshot { tag: String, available: String },

    #[error("Failed to initialize parser: {0}")]
    ParserInit(String),

    #[error("Failed to walk stubs directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("No symbol matches '{query}'")]
    NotFound { query: String },

    #[error("Failed to serialize symbol table: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write output '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    /// Hints printed under the error message by the CLI.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec!["Check that the file exists and is valid UTF-8"],
            Self::RootNotFound { .. } => vec![
                "Set stubs_root in .rubystubs/settings.toml",
                "Run 'rubystubs init' to create a default configuration",
            ],
            Self::NoSnapshots { .. } => vec![
                "Each snapshot is a directory such as 'rubystubs33' containing .rb stubs",
                "Check snapshot_prefix in .rubystubs/settings.toml",
            ],
            Self::UnknownSnapshot { .. } => {
                vec!["Run 'rubystubs versions' to list the available snapshots"]
            }
            Self::ConfigError { .. } => vec!["Run 'rubystubs config' to inspect the settings"],
            Self::NotFound { .. } => vec![
                "Queries look like 'String', 'String#center', 'File.exist?' or 'File::SEPARATOR'",
            ],
            Self::ParserInit(_)
            | Self::Walk(_)
            | Self::Serialization(_)
            | Self::FileWrite { .. } => Vec::new(),
        }
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
