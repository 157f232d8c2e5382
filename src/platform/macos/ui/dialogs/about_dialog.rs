//! About box (NSAlert).

use crate::platform::macos::ffi::bridge::{class, id, msg_send, nsstring, NSApp, YES};
use crate::ui::{about_text, ABOUT_TITLE};

/// # Safety
/// Main thread only.
pub unsafe fn show_about_dialog(hotkey: Option<&str>) {
    // Accessory apps are not frontmost; bring the alert forward
    let _: () = msg_send![NSApp(), activateIgnoringOtherApps: YES];

    let title = nsstring(ABOUT_TITLE);
    let text = nsstring(&about_text(hotkey));
    let alert: id = msg_send![class!(NSAlert), alloc];
    let alert: id = msg_send![alert, init];
    let _: () = msg_send![alert, setMessageText: &*title];
    let _: () = msg_send![alert, setInformativeText: &*text];
    let _: isize = msg_send![alert, runModal];
    let _: () = msg_send![alert, release];
}
