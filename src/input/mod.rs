//! Input handling module.
//!
//! This module contains the two global input sources:
//! - cursor.rs: pointer sampling thread ([`CursorTracker`])
//! - hotkeys.rs: toggle hotkey parsing, registration and listener
//! - debounce.rs: one toggle per physical key press

pub mod cursor;
pub mod debounce;
pub mod hotkeys;

pub use cursor::{CursorSource, CursorTracker};
pub use debounce::Debouncer;
pub use hotkeys::{
    GlobalHotKeyRegistrar, GlobalHotkeyListener, HotkeyRegistrar, KeyBinding, UnavailableRegistrar,
};
