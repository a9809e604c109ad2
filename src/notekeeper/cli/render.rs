use chrono::NaiveDateTime;
use colored::Colorize;
use notekeeper::error::NoteError;
use notekeeper::index::DisplayIndex;
use notekeeper::manager::{ListedNote, SearchHit};
use notekeeper::model::{self, Note, TIMESTAMP_FORMAT};
use std::io::{self, Write};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const INDEX_WIDTH: usize = 6;
const STAMP_WIDTH: usize = 19;
const AGE_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub fn message<W: Write>(out: &mut W, level: MessageLevel, text: &str) -> io::Result<()> {
    match level {
        MessageLevel::Info => writeln!(out, "{}", text.dimmed()),
        MessageLevel::Success => writeln!(out, "{}", text.green()),
        MessageLevel::Warning => writeln!(out, "{}", text.yellow()),
        MessageLevel::Error => writeln!(out, "{}", text.red()),
    }
}

/// Informational outcomes are dimmed, everything else is an error.
pub fn error<W: Write>(out: &mut W, err: &NoteError) -> io::Result<()> {
    let level = if err.is_informational() {
        MessageLevel::Info
    } else {
        MessageLevel::Error
    };
    message(out, level, &err.to_string())
}

pub fn note_list<W: Write>(out: &mut W, listed: &[ListedNote<'_>]) -> io::Result<()> {
    if listed.is_empty() {
        return message(out, MessageLevel::Info, "No notes to display.");
    }
    for entry in listed {
        row(out, entry.position, entry.title, entry.timestamp)?;
    }
    Ok(())
}

pub fn search_hits<W: Write>(
    out: &mut W,
    term: &str,
    hits: &[SearchHit<'_>],
    preview_chars: usize,
) -> io::Result<()> {
    if hits.is_empty() {
        let text = format!("No notes found matching '{}'.", term.trim());
        return message(out, MessageLevel::Info, &text);
    }
    for hit in hits {
        row(out, hit.position, hit.note.title(), hit.note.timestamp())?;
        let snippet = preview(hit.note.content(), preview_chars);
        if !snippet.is_empty() {
            writeln!(out, "{}{}", " ".repeat(INDEX_WIDTH), snippet.dimmed())?;
        }
    }
    Ok(())
}

pub fn full_note<W: Write>(out: &mut W, position: usize, note: &Note) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        DisplayIndex::from_position(position).to_string().yellow(),
        note.title().bold()
    )?;
    writeln!(out, "--------------------------------")?;
    writeln!(out, "{}", note.content())?;
    writeln!(out, "--------------------------------")?;
    writeln!(
        out,
        "{} {}",
        note.formatted_timestamp(),
        format!("({})", format_age(note.timestamp())).dimmed()
    )
}

fn row<W: Write>(
    out: &mut W,
    position: usize,
    title: &str,
    timestamp: NaiveDateTime,
) -> io::Result<()> {
    let idx = format!("{:>4}. ", DisplayIndex::from_position(position));
    let available = LINE_WIDTH.saturating_sub(INDEX_WIDTH + STAMP_WIDTH + AGE_WIDTH + 2);
    let title_display = truncate_to_width(&single_line(title), available);
    let padding = available.saturating_sub(title_display.width());

    writeln!(
        out,
        "{}{}{} {} {}",
        idx.yellow(),
        title_display,
        " ".repeat(padding),
        timestamp.format(TIMESTAMP_FORMAT).to_string().dimmed(),
        format!("{:>width$}", format_age(timestamp), width = AGE_WIDTH).dimmed()
    )
}

fn single_line(s: &str) -> String {
    s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect()
}

/// First `max_chars` characters of `content` on one line, with an ellipsis
/// when something was cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    let flat = single_line(content);
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_age(timestamp: NaiveDateTime) -> String {
    let elapsed = model::now().signed_duration_since(timestamp);
    Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}
