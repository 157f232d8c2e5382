//! AppKit user interface: overlay windows, the menu bar item and dialogs.

pub mod dialogs;
pub mod overlay;
pub mod status_bar;

pub use dialogs::{open_settings_file, show_about_dialog};
pub use overlay::MacSurface;
pub use status_bar::{action_selector, MacStatusItem};
