//! Settings persistence.
//!
//! The Settings collaborator used by the binary: a JSON file plus a watcher
//! that feeds edits into the event bus.

pub mod config;

pub use config::{SettingsStore, SettingsWatcher};
