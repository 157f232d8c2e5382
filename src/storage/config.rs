//! JSON settings file.
//!
//! Stores settings in `<config dir>/MouseCross/settings.json`
//! (`%APPDATA%` on Windows, `~/Library/Application Support` on macOS).
//!
//! The engine never reads this file. The binary loads it once at startup
//! and a [`SettingsWatcher`] publishes `SettingsChanged` whenever the file
//! is edited, so changes apply without a restart.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::events::{AppEvent, EventPublisher};
use crate::model::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::model::Settings;

/// Location of the settings file plus load/save helpers.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/MouseCross/settings.json`.
    pub fn default_location() -> Result<Self, CoreError> {
        let dir = dirs_next::config_dir()
            .ok_or_else(|| CoreError::Settings("no user configuration directory".into()))?;
        Ok(Self::new(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and sanitise. A missing file yields defaults.
    pub fn load(&self) -> Result<Settings, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let settings: Settings = serde_json::from_str(&contents)?;
                Ok(settings.sanitized())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write pretty JSON atomically (temp file + rename).
    pub fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Write defaults if the file does not exist yet, so it can be opened
    /// in an editor from the tray menu.
    pub fn ensure_exists(&self) -> Result<(), CoreError> {
        if self.path.exists() {
            return Ok(());
        }
        info!(path = %self.path.display(), "creating default settings file");
        self.save(&Settings::default())
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

/// Polls the settings file and publishes `SettingsChanged` on edits.
pub struct SettingsWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SettingsWatcher {
    pub fn spawn(
        store: SettingsStore,
        publisher: EventPublisher,
        interval: Duration,
    ) -> Result<Self, CoreError> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::Builder::new()
            .name("settings-watcher".into())
            .spawn(move || watch(store, publisher, interval, flag))?;
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop and join. Nothing is published after this returns.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for SettingsWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watch(store: SettingsStore, publisher: EventPublisher, interval: Duration, running: Arc<AtomicBool>) {
    let mut last = store.modified();
    loop {
        thread::park_timeout(interval);
        if !running.load(Ordering::Acquire) {
            break;
        }
        let current = store.modified();
        if current == last {
            continue;
        }
        last = current;
        match store.load() {
            Ok(settings) => {
                debug!(path = %store.path().display(), "settings file changed");
                if !running.load(Ordering::Acquire) || !publisher.publish(AppEvent::SettingsChanged(Box::new(settings))) {
                    break;
                }
            }
            // Editors often write in several steps; the next change retries.
            Err(e) => warn!(error = %e, "ignoring unparsable settings edit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("none.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
        let mut settings = Settings::default();
        settings.behavior.activate_on_start = true;
        settings.appearance.line_width_base = 5.0;
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(&path);
        assert!(matches!(store.load(), Err(CoreError::Json(_))));
    }

    #[test]
    fn test_loaded_values_are_sanitised() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"appearance":{"opacity":3.0}}"#).unwrap();
        let settings = SettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.appearance.opacity, 1.0);
    }

    #[test]
    fn test_ensure_exists_writes_defaults_once() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store.ensure_exists().unwrap();
        assert!(store.path().exists());
        fs::write(store.path(), r#"{"behavior":{"debug_logging":true}}"#).unwrap();
        store.ensure_exists().unwrap();
        assert!(store.load().unwrap().behavior.debug_logging);
    }

    #[test]
    fn test_watcher_stop_is_prompt() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let bus = EventBus::new();
        let mut watcher =
            SettingsWatcher::spawn(store, bus.publisher(), Duration::from_secs(60)).unwrap();
        watcher.stop();
        assert!(bus.drain().is_empty());
    }
}
