//! Modal About box and "Settings..." handling.

mod about_dialog;
mod settings_file;

pub use about_dialog::show_about_dialog;
pub use settings_file::open_settings_file;
