use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// On-disk and on-screen timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time at the resolution the persisted format keeps.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// A single note.
///
/// Fields are private so the length rules enforced by
/// [`NoteManager`](crate::manager::NoteManager) cannot be bypassed; the
/// manager is the only place that creates or revises notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    // Older files carry no id; one is minted when they are read.
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    title: String,
    content: String,
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
}

impl Note {
    pub(crate) fn new(id: Uuid, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            timestamp: now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Replaces title and content and re-stamps the note.
    ///
    /// The new timestamp never goes backwards, even if the clock does.
    pub(crate) fn revise(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.timestamp = now().max(self.timestamp);
    }

    /// Case-insensitive substring match against title and content.
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
