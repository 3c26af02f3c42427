//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("{path}: not found")]
    NotFound { path: String },

    #[error("{path}: not a readable directory")]
    PermissionDenied { path: String },

    #[error("{path}: no recognized files")]
    NoCertificates { path: String },

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build render context: {0}")]
    Context(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
