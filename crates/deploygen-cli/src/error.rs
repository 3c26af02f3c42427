//! CLI error types with exit code handling
//!
//! Library errors are folded into a single `CliError` so `main` can print a
//! diagnostic and pick the matching exit code.

use deploygen_core::CoreError;
use deploygen_engine::{EngineError, TemplateError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Contradictory, missing or out-of-range options
    #[error("Invalid arguments: {message}")]
    #[diagnostic(code(deploygen::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The certificates directory holds nothing usable
    #[error("Certificate error: {message}")]
    #[diagnostic(code(deploygen::cli::certificates))]
    Certificates {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Template lookup or rendering failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    /// IO error (not found, permissions, write failure)
    #[error("IO error: {message}")]
    #[diagnostic(code(deploygen::cli::io))]
    Io { message: String },

    /// Internal error (unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(deploygen::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Certificates { .. } => exit_codes::CERTIFICATE_ERROR,
            CliError::Template(_) => exit_codes::TEMPLATE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArguments { message } => Self::usage_with_help(
                message,
                "Run `deploygen --help` for the accepted options",
            ),
            CoreError::NoCertificates { .. } => Self::Certificates {
                message: err.to_string(),
                help: Some("Expected files ending in .crt, .key or .pem".to_string()),
            },
            CoreError::Context(_) => Self::internal(err.to_string()),
            CoreError::NotFound { .. }
            | CoreError::PermissionDenied { .. }
            | CoreError::ReadFile { .. }
            | CoreError::WriteOutput { .. }
            | CoreError::Io(_) => Self::Io {
                message: err.to_string(),
            },
        }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Template(e) => {
                tracing::debug!(kind = e.kind().to_code_string(), "template failed");
                Self::Template(e)
            }
            EngineError::Context(e) => e.into(),
            EngineError::Io(e) => Self::Io {
                message: e.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
