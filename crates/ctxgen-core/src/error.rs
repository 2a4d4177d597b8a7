/// Generator error types
use crate::diagnostic::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Failed to parse {}: {} syntax error(s)", .origin, .diagnostics.len())]
    Syntax {
        origin: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Malformed interface description: {}", summarize(.diagnostics))]
    Malformed { diagnostics: Vec<Diagnostic> },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid naming convention: {0}")]
    InvalidConvention(String),
}

impl GenError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }

    /// Create a malformed-description error
    pub fn malformed(diagnostics: Vec<Diagnostic>) -> Self {
        Self::Malformed { diagnostics }
    }

    /// Diagnostics carried by this error (empty for I/O and convention errors)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Syntax { diagnostics, .. } | Self::Malformed { diagnostics } => diagnostics,
            Self::Io { .. } | Self::InvalidConvention(_) => &[],
        }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}
