//! Notification observers.
//!
//! Screen reconfiguration, wake from sleep and session switches all publish
//! `DisplaysChanged` so the engine re-queries the layout. Termination runs a
//! cleanup closure before AppKit exits the process.

use block2::RcBlock;

use crate::events::{self, AppEvent};
use crate::platform::macos::ffi::bridge::{class, id, msg_send, nil, nsstring};

/// # Safety
/// Main thread, inside the application's autorelease pool.
pub unsafe fn install_display_observers() {
    let center: id = msg_send![class!(NSNotificationCenter), defaultCenter];
    add_observer(center, "NSApplicationDidChangeScreenParametersNotification");

    let ws: id = msg_send![class!(NSWorkspace), sharedWorkspace];
    let ws_center: id = msg_send![ws, notificationCenter];
    // Wake from sleep
    add_observer(ws_center, "NSWorkspaceDidWakeNotification");
    // Session became active (unlock/login)
    add_observer(ws_center, "NSWorkspaceSessionDidBecomeActiveNotification");
}

unsafe fn add_observer(center: id, name: &str) {
    let name = nsstring(name);
    let block = RcBlock::new(|_note: id| {
        events::publish(AppEvent::DisplaysChanged);
    });
    let _: id = msg_send![
        center,
        addObserverForName: &*name,
        object: nil,
        queue: nil,
        usingBlock: &*block
    ];
}

/// Run `cleanup` when the application is about to terminate.
///
/// # Safety
/// Main thread, inside the application's autorelease pool.
pub unsafe fn install_termination_observer(cleanup: impl Fn() + 'static) {
    let center: id = msg_send![class!(NSNotificationCenter), defaultCenter];
    let name = nsstring("NSApplicationWillTerminateNotification");
    let block = RcBlock::new(move |_note: id| cleanup());
    let _: id = msg_send![
        center,
        addObserverForName: &*name,
        object: nil,
        queue: nil,
        usingBlock: &*block
    ];
}
