//! About box for Windows.

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONINFORMATION, MB_OK};

use crate::platform::windows::ffi::wide;
use crate::ui::{about_text, ABOUT_TITLE};

/// Show the About dialog (modal).
pub fn show_about_dialog(hwnd: HWND, hotkey: Option<&str>) {
    let title = wide(ABOUT_TITLE);
    let message = wide(&about_text(hotkey));

    unsafe {
        MessageBoxW(
            Some(hwnd),
            PCWSTR(message.as_ptr()),
            PCWSTR(title.as_ptr()),
            MB_OK | MB_ICONINFORMATION,
        );
    }
}
