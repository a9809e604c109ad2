//! # Note Collection Manager
//!
//! [`NoteManager`] owns the in-memory collection for the lifetime of the
//! process. It is the only component that mutates notes, and every mutation
//! goes through the same validation, so the rules hold for anything that
//! reaches the store.
//!
//! ## Positions
//!
//! Operations take a **0-based** position into the current order (insertion
//! order). Positions are resolved at call time; a delete shifts everything
//! after it. User interfaces should convert their 1-based numbers with
//! [`DisplayIndex`](crate::index::DisplayIndex).
//!
//! ## Lifecycle
//!
//! ```text
//! open(store)  ──► add / edit / delete / search ... ──► save()
//!     │                                                   │
//!     └─ missing file: empty                              └─ backup, then overwrite
//!        corrupt / unreadable: empty + warning
//! ```

use crate::error::{Field, NoteError, Result};
use crate::export::{self, ExportFormat, ExportReport};
use crate::model::Note;
use crate::store::{NoteStore, SaveReport};
use chrono::NaiveDateTime;
use log::{debug, warn};
use std::path::Path;
use uuid::Uuid;

/// Validation rules applied on every add and edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Minimum length in characters, measured after trimming.
    pub min_length: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

impl Rules {
    /// Trims both fields and checks them. Emptiness is reported before length,
    /// title before content.
    pub fn validate(&self, title: &str, content: &str) -> Result<(String, String)> {
        let title = title.trim();
        let content = content.trim();

        for (field, value) in [(Field::Title, title), (Field::Content, content)] {
            if value.is_empty() {
                return Err(NoteError::EmptyField(field));
            }
        }

        for (field, value) in [(Field::Title, title), (Field::Content, content)] {
            let actual = value.chars().count();
            if actual < self.min_length {
                return Err(NoteError::TooShort {
                    field,
                    min: self.min_length,
                    actual,
                });
            }
        }

        Ok((title.to_string(), content.to_string()))
    }
}

/// Read-only projection of a note for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedNote<'a> {
    pub position: usize,
    pub title: &'a str,
    pub timestamp: NaiveDateTime,
}

/// A search match and where it sits in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub position: usize,
    pub note: &'a Note,
}

/// Owns the ordered note collection and the store it came from.
pub struct NoteManager<S: NoteStore> {
    store: S,
    notes: Vec<Note>,
    rules: Rules,
}

impl<S: NoteStore> NoteManager<S> {
    /// Loads the collection from `store`.
    ///
    /// Never fails: if the store reports corrupt data or an I/O failure the
    /// manager starts empty and the error is handed back as a warning.
    pub fn open(store: S, rules: Rules) -> (Self, Option<NoteError>) {
        let (notes, issue) = match store.load() {
            Ok(notes) => (notes, None),
            Err(e) => {
                warn!("Starting with an empty collection: {}", e);
                (Vec::new(), Some(e))
            }
        };
        let manager = Self {
            store,
            notes,
            rules,
        };
        (manager, issue)
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Validates and appends a new note. Returns its position.
    pub fn add(&mut self, title: &str, content: &str) -> Result<usize> {
        let (title, content) = self.rules.validate(title, content)?;
        let note = Note::new(self.fresh_id(), title, content);
        debug!("Added note {} ({})", note.id(), note.title());
        self.notes.push(note);
        Ok(self.notes.len() - 1)
    }

    /// Every note in display order. An empty result means an empty
    /// collection; that is a normal state, not an error.
    pub fn list(&self) -> Vec<ListedNote<'_>> {
        self.notes
            .iter()
            .enumerate()
            .map(|(position, note)| ListedNote {
                position,
                title: note.title(),
                timestamp: note.timestamp(),
            })
            .collect()
    }

    pub fn get(&self, position: usize) -> Option<&Note> {
        self.notes.get(position)
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<(usize, &Note)> {
        self.notes
            .iter()
            .enumerate()
            .find(|(_, note)| note.id() == id)
    }

    /// Replaces title and content at `position` and re-stamps the note.
    /// On any error the collection is untouched.
    pub fn edit(&mut self, position: usize, title: &str, content: &str) -> Result<()> {
        if position >= self.notes.len() {
            return Err(NoteError::NotFound(position));
        }
        let (title, content) = self.rules.validate(title, content)?;
        let note = &mut self.notes[position];
        note.revise(title, content);
        debug!("Edited note {} ({})", note.id(), note.title());
        Ok(())
    }

    /// Removes the note at `position` and returns its title. Asking the user
    /// for confirmation is the caller's job.
    pub fn delete(&mut self, position: usize) -> Result<String> {
        if position >= self.notes.len() {
            return Err(NoteError::NotFound(position));
        }
        let note = self.notes.remove(position);
        debug!("Deleted note {} ({})", note.id(), note.title());
        Ok(note.title().to_string())
    }

    /// Case-insensitive substring search over title and content, in
    /// collection order. The term is trimmed first; a blank term is
    /// [`NoteError::EmptyTerm`]. No matches is an empty result.
    pub fn search(&self, term: &str) -> Result<Vec<SearchHit<'_>>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(NoteError::EmptyTerm);
        }
        let needle = term.to_lowercase();

        Ok(self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.matches(&needle))
            .map(|(position, note)| SearchHit { position, note })
            .collect())
    }

    /// Persists the collection. On failure the in-memory state is intact.
    pub fn save(&mut self) -> Result<SaveReport> {
        self.store.save(&self.notes)
    }

    /// Discards in-memory state and re-reads the store. On error the current
    /// collection is kept.
    pub fn reload(&mut self) -> Result<usize> {
        self.notes = self.store.load()?;
        Ok(self.notes.len())
    }

    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<ExportReport> {
        export::export_to_path(path, &self.notes, format)
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.find_by_id(id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;
    use crate::store::memory::fixtures::ManagerFixture;
    use crate::store::memory::InMemoryStore;
    use std::collections::HashSet;

    fn manager() -> NoteManager<InMemoryStore> {
        ManagerFixture::new().manager
    }

    #[test]
    fn add_appends_trimmed_note() {
        let mut m = manager();
        let before = model::now();

        let pos = m.add("  Groceries ", " Buy milk and eggs\n").unwrap();

        assert_eq!(pos, 0);
        assert_eq!(m.len(), 1);
        let note = m.get(0).unwrap();
        assert_eq!(note.title(), "Groceries");
        assert_eq!(note.content(), "Buy milk and eggs");
        assert!(note.timestamp() >= before);
        assert!(note.timestamp() <= model::now());
    }

    #[test]
    fn add_rejects_empty_fields_without_side_effects() {
        let mut m = ManagerFixture::new().with_notes(1).manager;

        assert!(matches!(
            m.add("", "Valid content"),
            Err(NoteError::EmptyField(Field::Title))
        ));
        assert!(matches!(
            m.add("Valid", "   \t"),
            Err(NoteError::EmptyField(Field::Content))
        ));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn add_rejects_short_fields() {
        let mut m = manager();

        let err = m.add("ab", "Long enough").unwrap_err();
        assert!(matches!(
            err,
            NoteError::TooShort {
                field: Field::Title,
                min: 3,
                actual: 2
            }
        ));
        // Length is measured after trimming
        assert!(matches!(
            m.add("Title", "  xy  "),
            Err(NoteError::TooShort {
                field: Field::Content,
                ..
            })
        ));
        assert!(m.is_empty());
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let mut m = manager();
        assert!(m.add("日本語", "éèê").is_ok());
    }

    #[test]
    fn custom_rules_apply() {
        let (mut m, _) = NoteManager::open(InMemoryStore::new(), Rules { min_length: 5 });
        assert!(m.add("Four", "Long content").is_err());
        assert!(m.add("Fiver", "Long content").is_ok());
    }

    #[test]
    fn ids_are_unique() {
        let m = ManagerFixture::new().with_notes(50).manager;
        let ids: HashSet<_> = m.notes().iter().map(|n| n.id()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn list_projects_in_insertion_order() {
        let m = ManagerFixture::new()
            .with_note("First", "aaa")
            .with_note("Second", "bbb")
            .manager;

        let listed = m.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].position, 0);
        assert_eq!(listed[0].title, "First");
        assert_eq!(listed[1].title, "Second");
        assert_eq!(m.list(), listed);
    }

    #[test]
    fn list_of_empty_collection_is_empty() {
        assert!(manager().list().is_empty());
    }

    #[test]
    fn get_out_of_range_is_none() {
        let m = ManagerFixture::new().with_notes(2).manager;
        assert!(m.get(1).is_some());
        assert!(m.get(2).is_none());
        assert!(m.get(usize::MAX).is_none());
    }

    #[test]
    fn edit_updates_fields_and_timestamp() {
        let mut m = ManagerFixture::new().with_note("Title", "Old content").manager;
        let id = m.get(0).unwrap().id();
        let before = m.get(0).unwrap().timestamp();

        m.edit(0, "New title", "New content").unwrap();

        let note = m.get(0).unwrap();
        assert_eq!(note.id(), id);
        assert_eq!(note.title(), "New title");
        assert_eq!(note.content(), "New content");
        assert!(note.timestamp() >= before);
    }

    #[test]
    fn edit_with_invalid_input_leaves_note_untouched() {
        let mut m = ManagerFixture::new().with_note("Title", "Content").manager;
        let original = m.get(0).unwrap().clone();

        assert!(m.edit(0, "", "New content").is_err());
        assert!(m.edit(0, "New title", "no").is_err());
        assert!(matches!(
            m.edit(3, "New title", "New content"),
            Err(NoteError::NotFound(3))
        ));

        assert_eq!(m.get(0).unwrap(), &original);
    }

    #[test]
    fn delete_removes_and_shifts() {
        let mut m = ManagerFixture::new()
            .with_note("First", "aaa")
            .with_note("Second", "bbb")
            .with_note("Third", "ccc")
            .manager;

        assert_eq!(m.delete(1).unwrap(), "Second");

        let titles: Vec<_> = m.list().iter().map(|l| l.title.to_string()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
        assert_eq!(m.get(1).unwrap().title(), "Third");
    }

    #[test]
    fn delete_out_of_range_is_not_found() {
        let mut m = ManagerFixture::new().with_notes(2).manager;
        assert!(matches!(m.delete(2), Err(NoteError::NotFound(2))));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_content() {
        let m = ManagerFixture::new()
            .with_note("Groceries", "Buy milk")
            .with_note("Work", "Email the MILKMAN")
            .with_note("Ideas", "Nothing here")
            .manager;

        let hits = m.search("Milk").unwrap();
        let positions: Vec<_> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1]);

        let by_title = m.search("  IDEA ").unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].note.title(), "Ideas");
    }

    #[test]
    fn search_without_matches_is_empty_not_error() {
        let m = ManagerFixture::new().with_notes(3).manager;
        assert!(m.search("zebra").unwrap().is_empty());
        assert_eq!(m.search("note").unwrap(), m.search("note").unwrap());
    }

    #[test]
    fn search_blank_term_is_empty_term() {
        let m = ManagerFixture::new().with_notes(1).manager;
        assert!(matches!(m.search(""), Err(NoteError::EmptyTerm)));
        assert!(matches!(m.search("   "), Err(NoteError::EmptyTerm)));
    }

    #[test]
    fn find_by_id_survives_reordering() {
        let mut m = ManagerFixture::new().with_notes(3).manager;
        let id = m.get(2).unwrap().id();
        m.delete(0).unwrap();

        let (position, note) = m.find_by_id(id).unwrap();
        assert_eq!(position, 1);
        assert_eq!(note.title(), "Test Note 3");
    }

    #[test]
    fn save_and_reload_through_store() {
        let mut m = ManagerFixture::new().with_notes(2).manager;
        m.save().unwrap();
        assert_eq!(m.store().stored().len(), 2);
        assert_eq!(m.store().save_count(), 1);

        m.delete(0).unwrap();
        assert_eq!(m.reload().unwrap(), 2);
        assert_eq!(m.get(0).unwrap().title(), "Test Note 1");
    }

    #[test]
    fn open_loads_existing_notes() {
        let mut seed = manager();
        seed.add("Stored", "Already here").unwrap();
        let store = InMemoryStore::with_notes(seed.notes().to_vec());

        let (m, issue) = NoteManager::open(store, Rules::default());
        assert!(issue.is_none());
        assert_eq!(m.get(0).unwrap().title(), "Stored");
    }

    struct BrokenStore;

    impl NoteStore for BrokenStore {
        fn load(&self) -> Result<Vec<Note>> {
            Err(NoteError::CorruptData {
                path: "notes.json".into(),
                reason: "bad".into(),
            })
        }

        fn save(&mut self, _notes: &[Note]) -> Result<SaveReport> {
            Err(NoteError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn open_recovers_from_corrupt_store() {
        let (m, issue) = NoteManager::open(BrokenStore, Rules::default());
        assert!(m.is_empty());
        assert!(matches!(issue, Some(NoteError::CorruptData { .. })));
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let (mut m, _) = NoteManager::open(BrokenStore, Rules::default());
        m.add("Unsaved", "Still here").unwrap();

        assert!(matches!(m.save(), Err(NoteError::Io(_))));
        assert_eq!(m.len(), 1);
        assert!(m.reload().is_err());
        assert_eq!(m.len(), 1);
    }
}
