//! "Settings..." opens the JSON file in the user's editor.
//!
//! Edits are picked up by the settings watcher; there is no settings window.

use tracing::{info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use crate::platform::windows::ffi::wide;
use crate::storage::SettingsStore;

pub fn open_settings_file(hwnd: HWND, store: &SettingsStore) {
    if let Err(e) = store.ensure_exists() {
        warn!(error = %e, "could not create settings file");
        return;
    }
    let path = wide(&store.path().to_string_lossy());
    let result = unsafe {
        ShellExecuteW(
            Some(hwnd),
            w!("open"),
            PCWSTR(path.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    // Values above 32 mean success
    if result.0 as isize > 32 {
        info!(path = %store.path().display(), "opened settings file");
    } else {
        warn!(path = %store.path().display(), code = result.0 as isize, "could not open settings file");
    }
}
