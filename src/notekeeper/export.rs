use crate::error::{NoteError, Result};
use crate::model::Note;
use log::info;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Delimited formats notes can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(format!("Unknown export format: {} (expected csv or tsv)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Serialize)]
struct Row<'a> {
    title: &'a str,
    content: &'a str,
    timestamp: String,
}

/// Writes the header and one row per note. Ids are not part of the export.
pub fn write_notes<W: Write>(writer: W, notes: &[Note], format: ExportFormat) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    if notes.is_empty() {
        // serialize() only emits the header alongside the first record
        wtr.write_record(["title", "content", "timestamp"])
            .map_err(io::Error::from)?;
    }

    for note in notes {
        wtr.serialize(Row {
            title: note.title(),
            content: note.content(),
            timestamp: note.formatted_timestamp(),
        })
        .map_err(io::Error::from)?;
    }

    wtr.flush().map_err(NoteError::Io)?;
    Ok(())
}

/// Exports `notes` to `path`. An empty collection writes nothing and
/// returns [`NoteError::EmptyCollection`].
pub fn export_to_path(path: &Path, notes: &[Note], format: ExportFormat) -> Result<ExportReport> {
    if notes.is_empty() {
        return Err(NoteError::EmptyCollection);
    }

    let file = File::create(path).map_err(NoteError::Io)?;
    write_notes(file, notes, format)?;

    info!("Exported {} notes to {} as {}", notes.len(), path.display(), format);
    Ok(ExportReport {
        path: path.to_path_buf(),
        rows: notes.len(),
    })
}
