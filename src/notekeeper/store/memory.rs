use super::{NoteStore, SaveReport};
use crate::error::Result;
use crate::model::Note;

/// In-memory storage for testing.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    notes: Vec<Note>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes, saves: 0 }
    }

    pub fn stored(&self) -> &[Note] {
        &self.notes
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl NoteStore for InMemoryStore {
    fn load(&self) -> Result<Vec<Note>> {
        Ok(self.notes.clone())
    }

    fn save(&mut self, notes: &[Note]) -> Result<SaveReport> {
        let backup = (self.saves > 0).then(|| "memory-backup".into());
        self.notes = notes.to_vec();
        self.saves += 1;
        Ok(SaveReport {
            path: None,
            backup,
            count: notes.len(),
        })
    }
}

// --- Test Fixtures ---

pub mod fixtures {
    use super::*;
    use crate::manager::{NoteManager, Rules};

    /// A manager over an in-memory store, pre-filled through `add`.
    pub struct ManagerFixture {
        pub manager: NoteManager<InMemoryStore>,
    }

    impl Default for ManagerFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ManagerFixture {
        pub fn new() -> Self {
            let (manager, _) = NoteManager::open(InMemoryStore::new(), Rules::default());
            Self { manager }
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let title = format!("Test Note {}", i + 1);
                let content = format!("Content for note {}", i + 1);
                self.manager.add(&title, &content).unwrap();
            }
            self
        }

        pub fn with_note(mut self, title: &str, content: &str) -> Self {
            self.manager.add(title, content).unwrap();
            self
        }
    }
}
