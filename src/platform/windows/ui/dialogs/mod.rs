//! Dialog windows for Windows.

mod about_dialog;
mod settings_file;

pub use about_dialog::*;
pub use settings_file::*;
