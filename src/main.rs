//! MouseCross entry point.
//!
//! Loads settings, sets up logging and hands control to the platform run
//! loop until the user quits from the tray.

// No console window in release builds
#![cfg_attr(all(target_os = "windows", not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::Context;
use tracing::{info, warn};

use mousecross::logging;
use mousecross::model::Settings;
use mousecross::platform;
use mousecross::storage::SettingsStore;

fn main() -> anyhow::Result<()> {
    let store = SettingsStore::default_location().context("locating the settings directory")?;
    let loaded = store.load();
    logging::init(loaded.as_ref().map_or(false, |s| s.behavior.debug_logging));
    let settings = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "unreadable settings; using defaults");
        Settings::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        settings = %store.path().display(),
        "MouseCross starting"
    );

    platform::run(store, settings).context("crosshair overlay stopped")?;
    info!("MouseCross exited");
    Ok(())
}
