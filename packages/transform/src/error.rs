//! Error taxonomy and the single error shape handed to the host.

use std::backtrace::BacktraceStatus;
use std::fmt;

use thiserror::Error;
use ts::{flatten_diagnostic_message_text, Diagnostic, NEW_LINE};

use crate::compile::CompileFailure;

/// Invalid plugin options, reported when the plugin is constructed.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid plugin options: {0}")]
    Invalid(#[source] serde_json::Error),
    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to read options from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can end one module's transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No `tsconfig.json` above the module and no explicit location configured.
    #[error("Could not find TypeScript configuration for {file}")]
    ConfigurationNotFound { file: String },
    /// The configuration file (or a file it extends) is unreadable or malformed.
    #[error("{0}")]
    ConfigurationParse(Diagnostic),
    /// The compiler rejected the module.
    #[error("{0}")]
    Compilation(CompileFailure),
}

impl TransformError {
    /// Normalize into the shape the host reports for module `id`.
    pub fn into_host_error(self, id: &str) -> HostError {
        let (message, stack) = match self {
            TransformError::ConfigurationNotFound { .. } => (self.to_string(), None),
            TransformError::ConfigurationParse(diagnostic) => (
                flatten_diagnostic_message_text(&diagnostic.message_text, NEW_LINE),
                None,
            ),
            TransformError::Compilation(failure) => match failure {
                CompileFailure::Message(message) => (message, None),
                CompileFailure::Error(error) => {
                    let stack = match error.backtrace().status() {
                        BacktraceStatus::Captured => Some(error.backtrace().to_string()),
                        _ => None,
                    };
                    (format!("{:#}", error), stack)
                }
                CompileFailure::Diagnostic(chain) => {
                    (flatten_diagnostic_message_text(&chain, NEW_LINE), None)
                }
            },
        };

        HostError {
            message,
            stack,
            plugin: crate::plugin::PLUGIN_NAME,
            id: id.to_string(),
        }
    }
}

/// The error reported through the host's error channel for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub message: String,
    pub stack: Option<String>,
    pub plugin: &'static str,
    pub id: String,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.plugin, self.id, self.message)
    }
}

impl std::error::Error for HostError {}
