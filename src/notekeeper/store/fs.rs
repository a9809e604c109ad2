use super::{NoteStore, SaveReport};
use crate::error::{NoteError, Result};
use crate::model::Note;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_DATA_FILE: &str = "notes.json";
pub const DEFAULT_BACKUP_FILE: &str = "notes_backup.json";

/// Stores the collection as one pretty-printed JSON array.
///
/// Before an existing file is overwritten it is renamed to `backup_path`.
/// Only one generation is kept; the next save clobbers it.
///
/// If that rename fails the save is aborted: the current file stays where
/// it is and the error is returned, so a failed backup never costs data.
pub struct FileStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl FileStore {
    /// A store at `path` with the backup next to it as `notes_backup.json`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_path = path
            .parent()
            .map(|dir| dir.join(DEFAULT_BACKUP_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_FILE));
        Self { path, backup_path }
    }

    pub fn with_backup_path(mut self, backup_path: impl Into<PathBuf>) -> Self {
        self.backup_path = backup_path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(NoteError::Io)?;
            }
        }
        Ok(())
    }

    fn corrupt(&self, reason: impl Into<String>) -> NoteError {
        NoteError::CorruptData {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!(".notes-{}.tmp", Uuid::new_v4()))
    }
}

impl NoteStore for FileStore {
    fn load(&self) -> Result<Vec<Note>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No notes file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(NoteError::Io(e)),
        };

        let notes: Vec<Note> =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;

        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(note.id()) {
                return Err(self.corrupt(format!("duplicate note id {}", note.id())));
            }
        }

        info!("Loaded {} notes from {}", notes.len(), self.path.display());
        Ok(notes)
    }

    fn save(&mut self, notes: &[Note]) -> Result<SaveReport> {
        let content = serde_json::to_string_pretty(notes).map_err(NoteError::Serialization)?;
        self.ensure_parent_dir()?;

        // 1. Write the new generation next to the target
        let tmp = self.tmp_path();
        fs::write(&tmp, content).map_err(NoteError::Io)?;

        // 2. Move the previous generation aside
        let mut backup = None;
        if self.path.exists() {
            if let Err(e) = fs::rename(&self.path, &self.backup_path) {
                warn!(
                    "Could not back up {} to {}: {}; save aborted",
                    self.path.display(),
                    self.backup_path.display(),
                    e
                );
                let _ = fs::remove_file(&tmp);
                return Err(NoteError::Io(e));
            }
            debug!("Backed up previous notes to {}", self.backup_path.display());
            backup = Some(self.backup_path.clone());
        }

        // 3. Put the new generation in place
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(NoteError::Io(e));
        }

        info!("Saved {} notes to {}", notes.len(), self.path.display());
        Ok(SaveReport {
            path: Some(self.path.clone()),
            backup,
            count: notes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(title: &str, content: &str) -> Note {
        Note::new(Uuid::new_v4(), title.to_string(), content.to_string())
    }

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("notes.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = setup();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, mut store) = setup();
        let notes = vec![sample("First", "One"), sample("Second", "Two")];

        let report = store.save(&notes).unwrap();
        assert_eq!(report.count, 2);
        assert_eq!(report.backup, None);

        assert_eq!(store.load().unwrap(), notes);
    }

    #[test]
    fn second_save_backs_up_previous_generation() {
        let (dir, mut store) = setup();
        let first = vec![sample("First", "One")];
        store.save(&first).unwrap();

        let second = vec![sample("Second", "Two")];
        let report = store.save(&second).unwrap();

        let backup = dir.path().join(DEFAULT_BACKUP_FILE);
        assert_eq!(report.backup, Some(backup.clone()));
        let backed_up: Vec<Note> =
            serde_json::from_str(&fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(backed_up, first);
        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn failed_backup_aborts_save_and_keeps_file() {
        let (dir, mut store) = setup();
        let original = vec![sample("Keep", "Me safe")];
        store.save(&original).unwrap();

        // A non-empty directory at the backup path makes the rename fail.
        let blocker = dir.path().join(DEFAULT_BACKUP_FILE);
        let _ = fs::remove_file(&blocker);
        fs::create_dir_all(blocker.join("occupied")).unwrap();

        let err = store.save(&[sample("New", "Data")]).unwrap_err();
        assert!(matches!(err, NoteError::Io(_)));
        assert_eq!(store.load().unwrap(), original);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "leftover tmp files: {:?}", leftovers);
    }

    #[test]
    fn malformed_document_is_corrupt_data() {
        let (_dir, store) = setup();
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, NoteError::CorruptData { .. }));
    }

    #[test]
    fn wrong_shape_is_corrupt_data() {
        let (_dir, store) = setup();
        fs::write(store.path(), r#"[{"title": "Missing fields"}]"#).unwrap();

        assert!(matches!(
            store.load().unwrap_err(),
            NoteError::CorruptData { .. }
        ));
    }

    #[test]
    fn duplicate_ids_are_corrupt_data() {
        let (_dir, store) = setup();
        let id = Uuid::new_v4();
        let doc = format!(
            r#"[
                {{"id": "{id}", "title": "A", "content": "aaa", "timestamp": "2024-01-01 10:00:00"}},
                {{"id": "{id}", "title": "B", "content": "bbb", "timestamp": "2024-01-01 10:00:00"}}
            ]"#
        );
        fs::write(store.path(), doc).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("duplicate note id"));
    }

    #[test]
    fn reading_a_directory_is_io_failure() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.load().unwrap_err(), NoteError::Io(_)));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("notes.json"));

        store.save(&[sample("Deep", "Down")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
