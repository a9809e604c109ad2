//! # Storage Layer
//!
//! The [`NoteStore`] trait is the seam between the in-memory collection and
//! durable storage. The manager loads once at startup and saves on demand
//! and at shutdown; nothing else touches the file.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: a single JSON document holding every note, plus a
//!   one-generation backup written before each overwrite.
//! - [`memory::InMemoryStore`]: no persistence, for tests.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── notes.json          # JSON array of {id, title, content, timestamp}
//! ├── notes_backup.json   # previous notes.json, replaced on every save
//! └── config.json         # optional settings
//! ```
//!
//! ## Load Semantics
//!
//! `load` distinguishes three outcomes: a missing file is an empty
//! collection (first run), a malformed document is
//! [`NoteError::CorruptData`](crate::error::NoteError::CorruptData), and
//! anything else is [`NoteError::Io`](crate::error::NoteError::Io). The
//! manager turns the latter two into an empty collection plus a warning.

use crate::error::Result;
use crate::model::Note;
use std::path::PathBuf;

pub mod fs;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: Option<PathBuf>,
    /// Where the previous generation went, if there was one.
    pub backup: Option<PathBuf>,
    pub count: usize,
}

/// Abstract interface for note persistence.
pub trait NoteStore {
    /// Reads the whole collection, in stored order.
    fn load(&self) -> Result<Vec<Note>>;

    /// Replaces the stored collection with `notes`.
    fn save(&mut self, notes: &[Note]) -> Result<SaveReport>;
}
