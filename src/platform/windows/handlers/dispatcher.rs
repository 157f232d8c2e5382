//! Host window procedure for Windows.
//!
//! The host window is a hidden top-level window. It receives the tray
//! callback, display change broadcasts, the heartbeat timer and the
//! `WM_WAKE` message posted whenever an event lands on the bus. Every OS
//! callback only publishes; the engine is pumped from `WM_WAKE`/`WM_TIMER`.

use std::cell::Cell;

use tracing::{debug, info};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    DefWindowProcW, PostMessageW, PostQuitMessage, WM_APP, WM_CONTEXTMENU, WM_DESTROY,
    WM_DISPLAYCHANGE, WM_DPICHANGED, WM_LBUTTONDBLCLK, WM_LBUTTONUP, WM_RBUTTONUP, WM_TIMER,
};

use crate::events::{self, AppEvent};
use crate::handlers::HostRequest;
use crate::platform::windows::app::state::{host_hwnd, with_engine, STORE};
use crate::platform::windows::ui::{open_settings_file, show_about_dialog, show_tray_menu, WM_TRAYICON};
use crate::ui::{ClickFilter, TrayButton};

/// Posted by the bus waker.
pub const WM_WAKE: u32 = WM_APP + 1;

thread_local! {
    static CLICKS: Cell<ClickFilter> = Cell::new(ClickFilter::default());
}

// Heartbeat timer: pumps even if a wake-up was lost
pub const TIMER_HEARTBEAT: usize = 1;
pub const HEARTBEAT_MS: u32 = 250;

/// Bus waker: ask the UI thread to pump. Safe from any thread.
pub fn wake_loop() {
    if let Some(hwnd) = host_hwnd() {
        unsafe {
            let _ = PostMessageW(Some(hwnd), WM_WAKE, WPARAM(0), LPARAM(0));
        }
    }
}

fn tray_button(edge: TrayButton) {
    let gesture = CLICKS.with(|clicks| {
        let mut filter = clicks.get();
        let gesture = filter.gesture(edge);
        clicks.set(filter);
        gesture
    });
    if let Some(gesture) = gesture {
        events::publish(AppEvent::Tray(gesture));
    }
}

fn pump(hwnd: HWND) {
    let Some(requests) = with_engine(|engine| engine.pump()) else {
        return;
    };
    for request in requests {
        execute(hwnd, request);
    }
}

/// Runs outside the engine borrow; dialogs here are modal.
fn execute(hwnd: HWND, request: HostRequest) {
    debug!(?request, "host request");
    match request {
        HostRequest::OpenSettings => STORE.with(|s| {
            if let Some(store) = s.borrow().as_ref() {
                open_settings_file(hwnd, store);
            }
        }),
        HostRequest::ShowAbout => {
            let hotkey = with_engine(|engine| engine.active_binding().map(|b| b.to_string())).flatten();
            show_about_dialog(hwnd, hotkey.as_deref());
        }
        HostRequest::Quit => {
            info!("quit requested");
            unsafe { PostQuitMessage(0) };
        }
    }
}

pub extern "system" fn host_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_WAKE => {
            pump(hwnd);
            LRESULT(0)
        }

        WM_TIMER if wparam.0 == TIMER_HEARTBEAT => {
            pump(hwnd);
            LRESULT(0)
        }

        WM_DISPLAYCHANGE | WM_DPICHANGED => {
            events::publish(AppEvent::DisplaysChanged);
            unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
        }

        // System tray icon messages
        WM_TRAYICON => {
            match (lparam.0 as u32) & 0xFFFF {
                WM_LBUTTONUP => tray_button(TrayButton::Up),
                WM_LBUTTONDBLCLK => tray_button(TrayButton::DoubleClick),
                WM_RBUTTONUP | WM_CONTEXTMENU => {
                    if let Some(action) = show_tray_menu(hwnd) {
                        events::publish(AppEvent::TrayMenu(action));
                    }
                }
                _ => {}
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }

        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
