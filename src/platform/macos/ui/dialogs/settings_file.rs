//! "Settings..." reveals the JSON file in the default editor.

use tracing::{info, warn};

use crate::platform::macos::ffi::bridge::{class, id, msg_send, nil, nsstring, Bool};
use crate::storage::SettingsStore;

/// # Safety
/// Main thread only.
pub unsafe fn open_settings_file(store: &SettingsStore) {
    if let Err(e) = store.ensure_exists() {
        warn!(error = %e, "could not create settings file");
        return;
    }
    let path = nsstring(&store.path().to_string_lossy());
    let ws: id = msg_send![class!(NSWorkspace), sharedWorkspace];
    let url: id = msg_send![class!(NSURL), fileURLWithPath: &*path];
    if url == nil {
        warn!(path = %store.path().display(), "invalid settings path");
        return;
    }
    let opened: Bool = msg_send![ws, openURL: url];
    if opened.as_bool() {
        info!(path = %store.path().display(), "opened settings file");
    } else {
        warn!(path = %store.path().display(), "could not open settings file");
    }
}
