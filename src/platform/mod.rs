//! Platform-specific implementations.
//!
//! Each backend implements the capability traits for its OS and runs the
//! native event loop that pumps the [`Engine`](crate::Engine):
//! - overlay surface (transparent, click-through, topmost window)
//! - tray icon with menu and notifications
//! - pointer position and display enumeration
//! - host requests (settings file, About box, quit)

use crate::error::CoreError;
use crate::model::Settings;
use crate::storage::SettingsStore;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

/// Run the native event loop until the user quits.
#[cfg(target_os = "windows")]
pub fn run(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    windows::run(store, settings)
}

/// Run the native event loop until the user quits.
#[cfg(target_os = "macos")]
pub fn run(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    macos::run(store, settings)
}

/// No overlay backend exists for this OS.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn run(store: SettingsStore, _settings: Settings) -> Result<(), CoreError> {
    tracing::error!(path = %store.path().display(), "no overlay backend for this platform");
    Err(CoreError::RenderSurfaceUnavailable(format!(
        "{} is not supported",
        std::env::consts::OS
    )))
}
