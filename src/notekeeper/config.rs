use crate::error::{NoteError, Result};
use crate::export::ExportFormat;
use crate::manager::Rules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_MIN_LENGTH: usize = 3;
const DEFAULT_PREVIEW_CHARS: usize = 50;
const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Configuration for notekeeper, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotesConfig {
    /// Notes file name, relative to the data directory
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Single-generation backup, relative to the data directory
    #[serde(default = "default_backup_file")]
    pub backup_file: String,

    /// Default export target, relative to the data directory
    #[serde(default = "default_export_file")]
    pub export_file: String,

    /// Minimum characters for title and content, after trimming
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Characters of content shown in previews
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Invalid inputs tolerated before a prompt gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_data_file() -> String {
    crate::store::fs::DEFAULT_DATA_FILE.to_string()
}

fn default_backup_file() -> String {
    crate::store::fs::DEFAULT_BACKUP_FILE.to_string()
}

fn default_export_file() -> String {
    format!("notes.{}", ExportFormat::default())
}

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            backup_file: default_backup_file(),
            export_file: default_export_file(),
            min_length: DEFAULT_MIN_LENGTH,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Keys settable through `notekeeper config <key> <value>`.
pub const CONFIG_KEYS: [&str; 3] = ["min-length", "preview-chars", "max-attempts"];

impl NotesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NoteError::Io)?;
        let config: NotesConfig =
            serde_json::from_str(&content).map_err(NoteError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NoteError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NoteError::Serialization)?;
        fs::write(config_path, content).map_err(NoteError::Io)?;
        Ok(())
    }

    pub fn rules(&self) -> Rules {
        Rules {
            min_length: self.min_length,
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        match key {
            "min-length" => Some(self.min_length),
            "preview-chars" => Some(self.preview_chars),
            "max-attempts" => Some(self.max_attempts),
            _ => None,
        }
    }

    /// Sets a numeric key. `min-length` and `max-attempts` must be at least 1.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed: usize = value
            .trim()
            .parse()
            .map_err(|_| NoteError::Config(format!("{} expects a number, got {}", key, value)))?;

        match key {
            "min-length" | "max-attempts" if parsed == 0 => Err(NoteError::Config(format!(
                "{} must be at least 1",
                key
            ))),
            "min-length" => {
                self.min_length = parsed;
                Ok(())
            }
            "preview-chars" => {
                self.preview_chars = parsed;
                Ok(())
            }
            "max-attempts" => {
                self.max_attempts = parsed;
                Ok(())
            }
            other => Err(NoteError::Config(format!(
                "Unknown config key: {} (known: {})",
                other,
                CONFIG_KEYS.join(", ")
            ))),
        }
    }
}
