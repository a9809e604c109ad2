use clap::{Parser, Subcommand};
use notekeeper::export::ExportFormat;
use notekeeper::index::DisplayIndex;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notekeeper", version)]
#[command(about = "Keep short text notes in a local file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $NOTEKEEPER_DIR, then the platform data dir)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a note
    #[command(alias = "a")]
    Add { title: String, content: String },

    /// List notes
    #[command(alias = "ls")]
    List,

    /// Show a note in full
    #[command(alias = "v")]
    View {
        /// Note number, as shown by `list`
        index: DisplayIndex,
    },

    /// Replace a note's title and content
    #[command(alias = "e")]
    Edit {
        /// Note number, as shown by `list`
        index: DisplayIndex,
        title: String,
        content: String,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note number, as shown by `list`
        index: DisplayIndex,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Search titles and content (case-insensitive)
    #[command(alias = "s")]
    Search { term: String },

    /// Export notes as a delimited table
    Export {
        /// Output file (default: notes.csv in the data directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// csv or tsv
        #[arg(short, long, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Get or set configuration
    Config {
        /// min-length, preview-chars or max-attempts
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Interactive menu (the default)
    Menu,
}
