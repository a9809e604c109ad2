//! # CLI Layer
//!
//! One client of the notekeeper library, and the only place that knows
//! about stdin/stdout/stderr and exit codes.
//!
//! - [`setup`]: clap definitions
//! - [`commands`]: context setup and one handler per subcommand
//! - [`menu`]: the interactive terminal driver (default with no subcommand)
//! - [`render`]: colored output shared by both

pub mod commands;
pub mod menu;
pub mod render;
pub mod setup;

pub use commands::run;
