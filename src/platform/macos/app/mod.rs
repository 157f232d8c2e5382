//! macOS entry point: accessory NSApplication with a menu bar item.

pub mod state;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::events::{self, AppEvent, EventBus, Waker};
use crate::handlers::{Engine, PlatformParts};
use crate::input::{GlobalHotKeyRegistrar, HotkeyRegistrar, UnavailableRegistrar};
use crate::model::constants::SETTINGS_POLL_INTERVAL;
use crate::model::Settings;
use crate::platform::macos::ffi::accessibility_trusted;
use crate::platform::macos::ffi::bridge::{autoreleasepool, msg_send, Bool, NSApp};
use crate::platform::macos::handlers::{create_controller, start_heartbeat, wake_loop};
use crate::platform::macos::input::{
    install_display_observers, install_termination_observer, MacCursor, MacDisplays,
};
use crate::platform::macos::ui::{MacStatusItem, MacSurface};
use crate::storage::{SettingsStore, SettingsWatcher};

pub use state::{with_engine, ENGINE, STORE, WATCHER};

// NSApplicationActivationPolicyAccessory: no Dock icon, no menu bar
const ACTIVATION_POLICY_ACCESSORY: isize = 1;

/// Run until Quit.
pub fn run(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    autoreleasepool(|_| unsafe { run_app(store, settings) })
}

unsafe fn run_app(store: SettingsStore, settings: Settings) -> Result<(), CoreError> {
    let app = NSApp();
    let _: Bool = msg_send![app, setActivationPolicy: ACTIVATION_POLICY_ACCESSORY];

    // Not needed for the pointer position, but some hotkeys need it
    if !accessibility_trusted() {
        warn!("accessibility access not granted; some hotkeys may not register");
    }

    let controller = create_controller().ok_or_else(|| {
        CoreError::RenderSurfaceUnavailable("could not create the application controller".into())
    })?;

    let bus = EventBus::with_waker(Waker::new(wake_loop));
    events::install_publisher(bus.publisher());

    // A missing hotkey service disables the feature; the status item stays to report it
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
        surface: Box::new(MacSurface::new()),
        tray: Box::new(MacStatusItem::install(controller)),
        hotkeys,
        cursor: Arc::new(MacCursor),
        displays: Box::new(MacDisplays),
    };
    let mut engine = Engine::new(bus, parts, settings);
    engine.start();

    let watcher = SettingsWatcher::spawn(store.clone(), engine.publisher(), SETTINGS_POLL_INTERVAL)?;
    ENGINE.with(|e| *e.borrow_mut() = Some(engine));
    STORE.with(|s| *s.borrow_mut() = Some(store));
    WATCHER.with(|w| *w.borrow_mut() = Some(watcher));

    install_display_observers();
    // terminate: exits the process without returning from run
    install_termination_observer(state::teardown);
    start_heartbeat(controller);

    info!("run loop running");
    let _: () = msg_send![app, run];

    state::teardown();
    Ok(())
}
