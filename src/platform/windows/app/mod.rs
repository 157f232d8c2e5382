//! Windows entry point and message loop.

pub mod state;

use std::sync::Arc;

use tracing::{debug, error, info};
use windows::core::w;
use windows::Win32::Foundation::{HINSTANCE, HWND};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DestroyWindow, DispatchMessageW, GetMessageW, KillTimer, RegisterClassW,
    SetTimer, TranslateMessage, MSG, WINDOW_EX_STYLE, WNDCLASSW, WS_OVERLAPPED,
};

use crate::error::CoreError;
use crate::events::{self, AppEvent, EventBus, Waker};
use crate::handlers::{Engine, PlatformParts};
use crate::input::{GlobalHotKeyRegistrar, HotkeyRegistrar, UnavailableRegistrar};
use crate::model::constants::SETTINGS_POLL_INTERVAL;
use crate::model::Settings;
use crate::platform::windows::ffi::surface_error;
use crate::platform::windows::handlers::{host_proc, wake_loop, HEARTBEAT_MS, TIMER_HEARTBEAT};
use crate::platform::windows::input::{WinCursor, WinDisplays};
use crate::platform::windows::ui::{LayeredSurface, Win32Tray};
use crate::storage::{SettingsStore, SettingsWatcher};
use crate::ui::{OverlaySurface, UnavailableSurface};

pub use state::{with_engine, ENGINE, STORE};

/// Run until Quit.
pub fn run(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    unsafe {
        // Normally already set by the manifest
        if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_err() {
            debug!("DPI awareness already configured");
        }
        CoInitializeEx(None, COINIT_APARTMENTTHREADED)
            .ok()
            .map_err(|e| surface_error("CoInitializeEx", e))?;
    }

    let result = run_app(store, settings);

    unsafe { CoUninitialize() };
    result
}

fn run_app(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .map_err(|e| surface_error("GetModuleHandleW", e))?
        .into();
    let host = unsafe { create_host_window(instance)? };
    state::set_host_hwnd(Some(host));

    let bus = EventBus::with_waker(Waker::new(wake_loop));
    events::install_publisher(bus.publisher());

    // Feature failures leave the engine disabled; the tray stays up to report them
    let surface: Box<dyn OverlaySurface> = match LayeredSurface::new(instance) {
        Ok(surface) => Box::new(surface),
        Err(e) => {
            error!(error = %e, "overlay window unavailable");
            let fallback = UnavailableSurface::from_error(&e);
            bus.publisher().publish(AppEvent::FeatureFailed(fallback.fault()));
            Box::new(fallback)
        }
    };
    let hotkeys: Box<dyn HotkeyRegistrar> = match GlobalHotKeyRegistrar::new(bus.publisher()) {
        Ok(registrar) => Box::new(registrar),
        Err(e) => {
            error!(error = %e, "global hotkeys unavailable");
            let fallback = UnavailableRegistrar::from_error(&e);
            bus.publisher().publish(AppEvent::FeatureFailed(fallback.fault()));
            Box::new(fallback)
        }
    };
    let parts = PlatformParts {
        surface,
        tray: Box::new(Win32Tray::install(host)),
        hotkeys,
        cursor: Arc::new(WinCursor),
        displays: Box::new(WinDisplays),
    };
    let mut engine = Engine::new(bus, parts, settings);
    engine.start();

    let mut watcher = SettingsWatcher::spawn(store.clone(), engine.publisher(), SETTINGS_POLL_INTERVAL)?;
    ENGINE.with(|e| *e.borrow_mut() = Some(engine));
    STORE.with(|s| *s.borrow_mut() = Some(store));

    unsafe {
        SetTimer(Some(host), TIMER_HEARTBEAT, HEARTBEAT_MS, None);
    }
    info!("message loop running");

    // Message loop
    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    // Cleanup: the engine drop removes the tray icon and overlay window
    watcher.stop();
    if let Some(mut engine) = ENGINE.with(|e| e.borrow_mut().take()) {
        engine.shutdown();
    }
    STORE.with(|s| s.borrow_mut().take());
    state::set_host_hwnd(None);
    unsafe {
        let _ = KillTimer(Some(host), TIMER_HEARTBEAT);
        let _ = DestroyWindow(host);
    }
    Ok(())
}

/// Hidden top-level window for tray callbacks, broadcasts and wake-ups.
unsafe fn create_host_window(instance: HINSTANCE) -> Result<HWND, CoreError> {
    let class_name = w!("MouseCrossHost");
    let wc = WNDCLASSW {
        lpfnWndProc: Some(host_proc),
        hInstance: instance,
        lpszClassName: class_name,
        ..Default::default()
    };
    RegisterClassW(&wc);

    CreateWindowExW(
        WINDOW_EX_STYLE::default(),
        class_name,
        w!("MouseCross"),
        WS_OVERLAPPED,
        0,
        0,
        0,
        0,
        None,
        None,
        Some(instance),
        None,
    )
    .map_err(|e| surface_error("CreateWindowExW", e))
}
