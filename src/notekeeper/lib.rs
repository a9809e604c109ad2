//! # Notekeeper Architecture
//!
//! Notekeeper is a small local note keeper: create, list, view, edit, delete
//! and search short text notes, persisted to a JSON file and exportable to
//! CSV/TSV.
//!
//! It is a library with a CLI client. The library never writes to
//! stdout/stderr and never exits the process; it takes Rust arguments and
//! returns Rust types.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Subcommands and the interactive menu (terminal driver)   │
//! │  - 1-based note numbers, confirmation prompts, colors       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Manager (manager.rs)                                       │
//! │  - Owns the ordered collection                              │
//! │  - Validates every add/edit, resolves positions             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NoteStore trait                                          │
//! │  - FileStore (JSON + backup), InMemoryStore (testing)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//!
//! Every note carries a UUID minted at creation and never reassigned. The
//! public operations still address notes by their current position, since
//! that is what a user sees in a listing; the id keeps a note identifiable
//! across edits and deletes of its neighbours.
//!
//! ## Module Overview
//!
//! - [`manager`]: The collection manager, entry point for all operations
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: The [`Note`](model::Note) entity and timestamp format
//! - [`index`]: 1-based display numbers
//! - [`export`]: CSV/TSV export
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod manager;
pub mod model;
pub mod store;
