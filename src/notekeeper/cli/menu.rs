//! # Interactive Menu
//!
//! The terminal driver: a numbered menu over the [`NoteManager`]. It owns
//! everything the manager does not: prompting, turning 1-based input into
//! positions, asking before a delete, and rendering results.
//!
//! Input and output are generic so a session can be scripted in tests.
//! End of input is treated as "exit", so a closed stdin still saves. A
//! failed save on exit keeps the session open unless the user agrees to
//! discard the unsaved notes or input has run out.

use super::render::{self, MessageLevel};
use notekeeper::export::ExportFormat;
use notekeeper::index::DisplayIndex;
use notekeeper::manager::NoteManager;
use notekeeper::store::NoteStore;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Line-oriented prompt over any reader/writer pair.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows `label` and reads one line. `None` at end of input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Yes/no question; anything but `y`/`yes` is a no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{} (y/n): ", question))?;
        Ok(matches!(
            answer.map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    View,
    Edit,
    Delete,
    Search,
    Export,
    Save,
    Reload,
    Exit,
}

const MENU: [MenuAction; 9] = [
    MenuAction::Add,
    MenuAction::View,
    MenuAction::Edit,
    MenuAction::Delete,
    MenuAction::Search,
    MenuAction::Export,
    MenuAction::Save,
    MenuAction::Reload,
    MenuAction::Exit,
];

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Add => "Add note",
            MenuAction::View => "View notes",
            MenuAction::Edit => "Edit note",
            MenuAction::Delete => "Delete note",
            MenuAction::Search => "Search notes",
            MenuAction::Export => "Export notes",
            MenuAction::Save => "Save notes",
            MenuAction::Reload => "Reload notes from disk",
            MenuAction::Exit => "Exit",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<DisplayIndex>()
            .ok()
            .and_then(|idx| MENU.get(idx.position()).copied())
            .ok_or_else(|| {
                format!(
                    "Invalid choice. Please enter a number between 1 and {}.",
                    MENU.len()
                )
            })
    }
}

/// Driver settings, taken from the config file.
#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub max_attempts: usize,
    pub preview_chars: usize,
    pub export_path: PathBuf,
    pub export_format: ExportFormat,
}

/// Runs the menu until the user exits and the notes are saved.
///
/// Only terminal I/O errors end the session early; note errors are shown
/// and the menu carries on.
pub fn run<S, R, W>(
    manager: &mut NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()>
where
    S: NoteStore,
    R: BufRead,
    W: Write,
{
    loop {
        match choose_action(term, settings.max_attempts)? {
            MenuAction::Add => add_note(manager, settings, term)?,
            MenuAction::View => view_notes(manager, settings, term)?,
            MenuAction::Edit => edit_note(manager, settings, term)?,
            MenuAction::Delete => delete_note(manager, settings, term)?,
            MenuAction::Search => search_notes(manager, settings, term)?,
            MenuAction::Export => export_notes(manager, settings, term)?,
            MenuAction::Save => {
                save_notes(manager, term)?;
            }
            MenuAction::Reload => reload_notes(manager, term)?,
            MenuAction::Exit => {
                if save_notes(manager, term)? || confirm_discard(term)? {
                    return render::message(term.output(), MessageLevel::Info, "Goodbye!");
                }
            }
        }
    }
}

/// Asks whether to quit after a failed save. End of input counts as yes.
fn confirm_discard<R: BufRead, W: Write>(term: &mut Terminal<R, W>) -> io::Result<bool> {
    let answer = term.prompt("Notes were not saved. Exit anyway and lose changes? (y/n): ")?;
    Ok(match answer {
        None => true,
        Some(a) => matches!(a.trim().to_lowercase().as_str(), "y" | "yes"),
    })
}

fn choose_action<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    max_attempts: usize,
) -> io::Result<MenuAction> {
    for _ in 0..max_attempts {
        let out = term.output();
        writeln!(out)?;
        writeln!(out, "--- Notes Menu ---")?;
        for (i, action) in MENU.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, action)?;
        }

        let label = format!("Enter your choice (1-{}): ", MENU.len());
        let Some(choice) = term.prompt(&label)? else {
            return Ok(MenuAction::Exit);
        };
        match choice.parse() {
            Ok(action) => return Ok(action),
            Err(msg) => render::message(term.output(), MessageLevel::Error, &msg)?,
        }
    }
    render::message(
        term.output(),
        MessageLevel::Warning,
        "Too many invalid attempts. Exiting.",
    )?;
    Ok(MenuAction::Exit)
}

/// Asks for a note number until it names an existing note.
fn prompt_position<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    len: usize,
    max_attempts: usize,
    label: &str,
) -> io::Result<Option<usize>> {
    for _ in 0..max_attempts {
        let Some(input) = term.prompt(label)? else {
            return Ok(None);
        };
        match input.parse::<DisplayIndex>() {
            Ok(idx) if idx.position() < len => return Ok(Some(idx.position())),
            Ok(_) => render::message(term.output(), MessageLevel::Error, "Invalid note number.")?,
            Err(_) => render::message(
                term.output(),
                MessageLevel::Error,
                "Invalid input. Please enter a number.",
            )?,
        }
    }
    render::message(
        term.output(),
        MessageLevel::Warning,
        "Too many invalid attempts. Returning to main menu.",
    )?;
    Ok(None)
}

fn add_note<S: NoteStore, R: BufRead, W: Write>(
    manager: &mut NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    let title_label = format!(
        "Enter note title (at least {} characters): ",
        manager.rules().min_length
    );
    for _ in 0..settings.max_attempts {
        let Some(title) = term.prompt(&title_label)? else {
            return Ok(());
        };
        let Some(content) = term.prompt("Enter note content: ")? else {
            return Ok(());
        };
        match manager.add(&title, &content) {
            Ok(position) => {
                let text = format!("Note added ({}).", DisplayIndex::from_position(position));
                return render::message(term.output(), MessageLevel::Success, &text);
            }
            Err(e) if e.is_validation() => render::error(term.output(), &e)?,
            Err(e) => return render::error(term.output(), &e),
        }
    }
    render::message(
        term.output(),
        MessageLevel::Warning,
        "Too many invalid attempts. Returning to main menu.",
    )
}

fn view_notes<S: NoteStore, R: BufRead, W: Write>(
    manager: &NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    render::note_list(term.output(), &manager.list())?;
    if manager.is_empty() {
        return Ok(());
    }

    let mut failures = 0;
    while failures < settings.max_attempts {
        let label = "Enter note number to view details (or press Enter to return): ";
        let Some(input) = term.prompt(label)? else {
            return Ok(());
        };
        if input.trim().is_empty() {
            return Ok(());
        }
        let found = input
            .parse::<DisplayIndex>()
            .ok()
            .and_then(|idx| manager.get(idx.position()).map(|note| (idx.position(), note)));
        match found {
            Some((position, note)) => {
                failures = 0;
                render::full_note(term.output(), position, note)?;
            }
            None => {
                failures += 1;
                render::message(term.output(), MessageLevel::Error, "Invalid note number.")?;
            }
        }
    }
    render::message(
        term.output(),
        MessageLevel::Warning,
        "Too many invalid attempts. Returning to main menu.",
    )
}

fn edit_note<S: NoteStore, R: BufRead, W: Write>(
    manager: &mut NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    render::note_list(term.output(), &manager.list())?;
    if manager.is_empty() {
        return Ok(());
    }
    let Some(position) = prompt_position(
        term,
        manager.len(),
        settings.max_attempts,
        "Enter the number of the note to edit: ",
    )?
    else {
        return Ok(());
    };

    for _ in 0..settings.max_attempts {
        let (current_title, current_content) = match manager.get(position) {
            Some(note) => (note.title().to_string(), note.content().to_string()),
            None => return Ok(()),
        };
        let label = format!("New title (Enter keeps '{}'): ", current_title);
        let Some(title) = term.prompt(&label)? else {
            return Ok(());
        };
        let label = format!("New content (Enter keeps '{}'): ", current_content);
        let Some(content) = term.prompt(&label)? else {
            return Ok(());
        };

        let title = if title.trim().is_empty() { current_title } else { title };
        let content = if content.trim().is_empty() { current_content } else { content };

        match manager.edit(position, &title, &content) {
            Ok(()) => return render::message(term.output(), MessageLevel::Success, "Note updated."),
            Err(e) if e.is_validation() => render::error(term.output(), &e)?,
            Err(e) => return render::error(term.output(), &e),
        }
    }
    render::message(
        term.output(),
        MessageLevel::Warning,
        "Too many invalid attempts. Returning to main menu.",
    )
}

fn delete_note<S: NoteStore, R: BufRead, W: Write>(
    manager: &mut NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    render::note_list(term.output(), &manager.list())?;
    if manager.is_empty() {
        return Ok(());
    }
    let Some(position) = prompt_position(
        term,
        manager.len(),
        settings.max_attempts,
        "Enter the number of the note to delete: ",
    )?
    else {
        return Ok(());
    };

    let title = manager
        .get(position)
        .map(|note| note.title().to_string())
        .unwrap_or_default();
    if !term.confirm(&format!("Are you sure you want to delete note '{}'?", title))? {
        return render::message(term.output(), MessageLevel::Info, "Deletion cancelled.");
    }

    match manager.delete(position) {
        Ok(title) => render::message(
            term.output(),
            MessageLevel::Success,
            &format!("Note '{}' deleted.", title),
        ),
        Err(e) => render::error(term.output(), &e),
    }
}

fn search_notes<S: NoteStore, R: BufRead, W: Write>(
    manager: &NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    let Some(term_input) = term.prompt("Enter search term: ")? else {
        return Ok(());
    };
    match manager.search(&term_input) {
        Ok(hits) => render::search_hits(term.output(), &term_input, &hits, settings.preview_chars),
        Err(e) => render::error(term.output(), &e),
    }
}

fn export_notes<S: NoteStore, R: BufRead, W: Write>(
    manager: &NoteManager<S>,
    settings: &MenuSettings,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    match manager.export(&settings.export_path, settings.export_format) {
        Ok(report) => render::message(
            term.output(),
            MessageLevel::Success,
            &format!("Exported {} notes to {}", report.rows, report.path.display()),
        ),
        Err(e) => render::error(term.output(), &e),
    }
}

/// Saves and reports the outcome; `false` when the notes are not on disk.
fn save_notes<S: NoteStore, R: BufRead, W: Write>(
    manager: &mut NoteManager<S>,
    term: &mut Terminal<R, W>,
) -> io::Result<bool> {
    match manager.save() {
        Ok(report) => {
            let out = term.output();
            if let Some(backup) = &report.backup {
                let text = format!("Previous notes backed up to {}", backup.display());
                render::message(out, MessageLevel::Info, &text)?;
            }
            let text = match &report.path {
                Some(path) => format!("Saved {} notes to {}", report.count, path.display()),
                None => format!("Saved {} notes", report.count),
            };
            render::message(out, MessageLevel::Success, &text)?;
            Ok(true)
        }
        Err(e) => {
            let text = format!("Could not save notes: {}", e);
            render::message(term.output(), MessageLevel::Error, &text)?;
            Ok(false)
        }
    }
}

fn reload_notes<S: NoteStore, R: BufRead, W: Write>(
    manager: &mut NoteManager<S>,
    term: &mut Terminal<R, W>,
) -> io::Result<()> {
    match manager.reload() {
        Ok(count) => render::message(
            term.output(),
            MessageLevel::Success,
            &format!("Reloaded {} notes.", count),
        ),
        Err(e) => {
            let text = format!("Could not reload notes: {}", e);
            render::message(term.output(), MessageLevel::Error, &text)
        }
    }
}
