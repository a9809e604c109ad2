//! Subcommand dispatch: builds the context, calls the manager, renders.
//!
//! Mutating subcommands save straight away, unless loading the notes file
//! reported a problem: saving then would push the unreadable file into the
//! single backup slot. Informational outcomes (nothing
//! to export, blank search term) are printed and exit successfully; every
//! other error bubbles up to `main`, which prints it and exits non-zero.

use super::menu::{self, MenuSettings, Terminal};
use super::render::{self, MessageLevel};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use env_logger::Env;
use notekeeper::config::{NotesConfig, CONFIG_KEYS};
use notekeeper::error::{NoteError, Result};
use notekeeper::export::ExportFormat;
use notekeeper::index::DisplayIndex;
use notekeeper::manager::NoteManager;
use notekeeper::store::fs::FileStore;
use std::io::{self, Write};
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "NOTEKEEPER_DIR";

struct AppContext {
    manager: NoteManager<FileStore>,
    config: NotesConfig,
    data_dir: PathBuf,
    load_issue: Option<NoteError>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add { title, content }) => handle_add(&mut ctx, &title, &content),
        Some(Commands::List) => handle_list(&ctx),
        Some(Commands::View { index }) => handle_view(&ctx, index),
        Some(Commands::Edit {
            index,
            title,
            content,
        }) => handle_edit(&mut ctx, index, &title, &content),
        Some(Commands::Delete { index, yes }) => handle_delete(&mut ctx, index, yes),
        Some(Commands::Search { term }) => handle_search(&ctx, &term),
        Some(Commands::Export { path, format }) => handle_export(&ctx, path, format),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Menu) | None => handle_menu(&mut ctx),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "notekeeper", "notekeeper")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| NoteError::Config("Could not determine a data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    let mut err = io::stderr();

    let config = match NotesConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            let text = format!("Ignoring unreadable config ({}), using defaults", e);
            render::message(&mut err, MessageLevel::Warning, &text)?;
            NotesConfig::default()
        }
    };

    let store = FileStore::new(data_dir.join(&config.data_file))
        .with_backup_path(data_dir.join(&config.backup_file));
    let (manager, load_issue) = NoteManager::open(store, config.rules());
    if let Some(e) = &load_issue {
        let text = format!(
            "{}\nStarting with an empty collection; the old file moves to {} on the next save.",
            e,
            manager.store().backup_path().display()
        );
        render::message(&mut err, MessageLevel::Warning, &text)?;
    }

    Ok(AppContext {
        manager,
        config,
        data_dir,
        load_issue,
    })
}

/// Prints informational outcomes and swallows them; everything else is an error.
fn informational(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_informational() => {
            render::error(&mut io::stdout().lock(), &e)?;
            Ok(())
        }
        other => other,
    }
}

fn save(ctx: &mut AppContext) -> Result<()> {
    let report = ctx.manager.save()?;
    log::debug!("save report: {:?}", report);
    Ok(())
}

/// One-shot edits refuse to overwrite a notes file that failed to load.
fn ensure_loaded(ctx: &AppContext) -> Result<()> {
    match &ctx.load_issue {
        None => Ok(()),
        Some(e) => Err(NoteError::Unchanged(format!(
            "{}. Repair or move {} first, or use the menu to start over.",
            e,
            ctx.manager.store().path().display()
        ))),
    }
}

fn handle_add(ctx: &mut AppContext, title: &str, content: &str) -> Result<()> {
    ensure_loaded(ctx)?;
    let position = ctx.manager.add(title, content)?;
    save(ctx)?;
    let text = format!("Note added ({}).", DisplayIndex::from_position(position));
    render::message(&mut io::stdout().lock(), MessageLevel::Success, &text)?;
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    render::note_list(&mut io::stdout().lock(), &ctx.manager.list())?;
    Ok(())
}

fn handle_view(ctx: &AppContext, index: DisplayIndex) -> Result<()> {
    let position = index.position();
    let note = ctx
        .manager
        .get(position)
        .ok_or(NoteError::NotFound(position))?;
    render::full_note(&mut io::stdout().lock(), position, note)?;
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    index: DisplayIndex,
    title: &str,
    content: &str,
) -> Result<()> {
    ensure_loaded(ctx)?;
    ctx.manager.edit(index.position(), title, content)?;
    save(ctx)?;
    let text = format!("Note {} updated.", index);
    render::message(&mut io::stdout().lock(), MessageLevel::Success, &text)?;
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, index: DisplayIndex, yes: bool) -> Result<()> {
    ensure_loaded(ctx)?;
    let position = index.position();
    let title = ctx
        .manager
        .get(position)
        .map(|note| note.title().to_string())
        .ok_or(NoteError::NotFound(position))?;

    if !yes {
        let stdin = io::stdin();
        let mut term = Terminal::new(stdin.lock(), io::stdout());
        let question = format!("Are you sure you want to delete note '{}'?", title);
        if !term.confirm(&question)? {
            render::message(term.output(), MessageLevel::Info, "Deletion cancelled.")?;
            return Ok(());
        }
    }

    let title = ctx.manager.delete(position)?;
    save(ctx)?;
    let text = format!("Note '{}' deleted.", title);
    render::message(&mut io::stdout().lock(), MessageLevel::Success, &text)?;
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str) -> Result<()> {
    informational(ctx.manager.search(term).and_then(|hits| {
        render::search_hits(
            &mut io::stdout().lock(),
            term,
            &hits,
            ctx.config.preview_chars,
        )?;
        Ok(())
    }))
}

fn handle_export(
    ctx: &AppContext,
    path: Option<PathBuf>,
    format: ExportFormat,
) -> Result<()> {
    let path = path.unwrap_or_else(|| ctx.data_dir.join(&ctx.config.export_file));
    informational(ctx.manager.export(&path, format).and_then(|report| {
        let text = format!("Exported {} notes to {}", report.rows, report.path.display());
        render::message(&mut io::stdout().lock(), MessageLevel::Success, &text)?;
        Ok(())
    }))
}

fn handle_config(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let mut out = io::stdout().lock();
    match (key, value) {
        (None, _) => {
            for key in CONFIG_KEYS {
                if let Some(v) = ctx.config.get(key) {
                    writeln!(out, "{} = {}", key, v)?;
                }
            }
            writeln!(out, "data-file = {}", ctx.config.data_file)?;
            writeln!(out, "data-dir = {}", ctx.data_dir.display())?;
        }
        (Some(key), None) => match ctx.config.get(&key) {
            Some(v) => writeln!(out, "{} = {}", key, v)?,
            None => return Err(NoteError::Config(format!("Unknown config key: {}", key))),
        },
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value)?;
            ctx.config.save(&ctx.data_dir)?;
            let text = format!("{} = {}", key, value.trim());
            render::message(&mut out, MessageLevel::Success, &text)?;
        }
    }
    Ok(())
}

fn handle_menu(ctx: &mut AppContext) -> Result<()> {
    let settings = MenuSettings {
        max_attempts: ctx.config.max_attempts.max(1),
        preview_chars: ctx.config.preview_chars,
        export_path: ctx.data_dir.join(&ctx.config.export_file),
        export_format: ExportFormat::default(),
    };
    let stdin = io::stdin();
    let mut term = Terminal::new(stdin.lock(), io::stdout());
    menu::run(&mut ctx.manager, &settings, &mut term)?;
    Ok(())
}
