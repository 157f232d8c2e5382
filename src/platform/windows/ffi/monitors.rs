//! Monitor enumeration.
//!
//! The process is per-monitor DPI aware (see the manifest), so monitor
//! rectangles and `GetCursorPos` share one physical-pixel space.

use windows::core::BOOL;
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO};
use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};
use windows::Win32::UI::WindowsAndMessaging::USER_DEFAULT_SCREEN_DPI;

use crate::error::CoreError;
use crate::model::{MonitorId, MonitorInfo, Rect};

/// All attached monitors with their effective scale (dpi / 96).
pub fn enumerate_monitors() -> Result<Vec<MonitorInfo>, CoreError> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();
    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(collect_monitor),
            LPARAM(&mut monitors as *mut Vec<MonitorInfo> as isize),
        )
    };
    if !ok.as_bool() {
        return Err(CoreError::DisplayReconfiguration(
            "EnumDisplayMonitors failed".into(),
        ));
    }
    Ok(monitors)
}

unsafe extern "system" fn collect_monitor(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let monitors = &mut *(data.0 as *mut Vec<MonitorInfo>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    if !GetMonitorInfoW(monitor, &mut info).as_bool() {
        return BOOL(1);
    }

    let mut dpi_x = USER_DEFAULT_SCREEN_DPI;
    let mut dpi_y = USER_DEFAULT_SCREEN_DPI;
    if GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y).is_err() {
        dpi_x = USER_DEFAULT_SCREEN_DPI;
    }

    let r = info.rcMonitor;
    monitors.push(MonitorInfo {
        id: MonitorId(monitors.len() as u32),
        bounds: Rect::new(
            r.left as f64,
            r.top as f64,
            (r.right - r.left) as f64,
            (r.bottom - r.top) as f64,
        ),
        scale: dpi_x as f64 / USER_DEFAULT_SCREEN_DPI as f64,
    });
    BOOL(1)
}
