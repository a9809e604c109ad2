use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The note field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "Title"),
            Field::Content => write!(f, "Content"),
        }
    }
}

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("{0} cannot be empty")]
    EmptyField(Field),

    #[error("{field} must be at least {min} characters (got {actual})")]
    TooShort {
        field: Field,
        min: usize,
        actual: usize,
    },

    // Holds the 0-based position; users count from 1.
    #[error("No note at position {}", .0 + 1)]
    NotFound(usize),

    #[error("Search term cannot be empty")]
    EmptyTerm,

    #[error("No notes to export")]
    EmptyCollection,

    #[error("Notes file {} is corrupted: {reason}", .path.display())]
    CorruptData { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Notes left unchanged: {0}")]
    Unchanged(String),
}

impl NoteError {
    /// Informational outcomes are "nothing to do", not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, NoteError::EmptyTerm | NoteError::EmptyCollection)
    }

    /// Validation failures the user can fix by re-entering input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NoteError::EmptyField(_) | NoteError::TooShort { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NoteError>;
