use std::fmt;

use thiserror::Error;

use crate::validation::ValidationReport;

/// High-level error type shared across Folio components.
///
/// Validator findings are not errors; they are reported as [`crate::Violation`] values. The
/// variants here cover fail-fast paths: registry assembly, request-time lookups, and loading.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("duplicate slug '{slug}': already registered from {existing}, rejected from {incoming}")]
    DuplicateSlug {
        slug: String,
        existing: String,
        incoming: String,
    },
    #[error("article not found: {0}")]
    NotFound(String),
    #[error("broken reference: '{from}' links to missing article '{to}'")]
    BrokenReference { from: String, to: String },
    #[error("registry snapshot rejected: {} fatal violation(s)", .0.error_count())]
    Rejected(Box<ValidationReport>),
    #[error("workspace error: {0}")]
    Workspace(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for FolioError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl FolioError {
    /// Prefixes the message of string-carrying variants with `ctx`.
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            FolioError::Workspace(msg) => FolioError::Workspace(format!("{ctx}: {msg}")),
            FolioError::Config(msg) => FolioError::Config(format!("{ctx}: {msg}")),
            FolioError::Serialization(msg) => FolioError::Serialization(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
