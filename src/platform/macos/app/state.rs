//! macOS runtime state, owned by the main thread.

use std::cell::RefCell;

use tracing::trace;

use crate::handlers::Engine;
use crate::storage::{SettingsStore, SettingsWatcher};

thread_local! {
    pub static ENGINE: RefCell<Option<Engine>> = const { RefCell::new(None) };
    pub static STORE: RefCell<Option<SettingsStore>> = const { RefCell::new(None) };
    pub static WATCHER: RefCell<Option<SettingsWatcher>> = const { RefCell::new(None) };
}

/// Run `f` against the engine. `None` if not installed or already borrowed.
pub fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
    ENGINE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            trace!("engine busy; deferring");
            None
        }
    })
}

/// Stop the watcher and tear the engine down. Safe to call twice.
pub fn teardown() {
    if let Some(mut watcher) = WATCHER.with(|w| w.borrow_mut().take()) {
        watcher.stop();
    }
    if let Some(mut engine) = ENGINE.with(|e| e.borrow_mut().take()) {
        engine.shutdown();
    }
    STORE.with(|s| s.borrow_mut().take());
}
