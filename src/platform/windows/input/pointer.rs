//! `GetCursorPos` pointer source and `EnumDisplayMonitors` display source.

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

use crate::error::CoreError;
use crate::handlers::DisplaySource;
use crate::input::CursorSource;
use crate::model::{MonitorInfo, Point};
use crate::platform::windows::ffi::enumerate_monitors;

/// Polls the system pointer. No permission is needed on Windows.
pub struct WinCursor;

impl CursorSource for WinCursor {
    fn pointer_position(&self) -> Result<Option<Point>, CoreError> {
        let mut pt = POINT::default();
        // Fails on the secure desktop (UAC prompt, lock screen).
        match unsafe { GetCursorPos(&mut pt) } {
            Ok(()) => Ok(Some(Point::new(pt.x as f64, pt.y as f64))),
            Err(_) => Ok(None),
        }
    }
}

pub struct WinDisplays;

impl DisplaySource for WinDisplays {
    fn displays(&self) -> Result<Vec<MonitorInfo>, CoreError> {
        enumerate_monitors()
    }
}
