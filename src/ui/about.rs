//! Text of the About box, shared by both platform dialogs.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ABOUT_TITLE: &str = "About MouseCross";

pub fn about_text(hotkey: Option<&str>) -> String {
    let hotkey = hotkey.unwrap_or("none (see settings)");
    format!(
        "MouseCross v{}\n\n\
        A full-screen crosshair that follows the mouse pointer,\n\
        so the pointer is easy to find on large or multiple screens.\n\n\
        Toggle hotkey: {}",
        VERSION, hotkey
    )
}
