//! UI components for Windows.

pub mod dialogs;
pub mod overlay;
pub mod tray;

pub use dialogs::{open_settings_file, show_about_dialog};
pub use overlay::LayeredSurface;
pub use tray::{show_tray_menu, Win32Tray, WM_TRAYICON};
