//! MouseCrossController: the Objective-C object AppKit calls back into.
//!
//! - `pump:` drains the bus. It is the heartbeat timer's selector and the
//!   target of `performSelectorOnMainThread:` from the waker.
//! - Menu actions only publish `TrayMenu` events.
//!
//! Host requests returned by the engine run after the engine borrow ends,
//! so a modal alert that keeps the run loop spinning can still pump.

use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::events::{self, AppEvent, TrayAction};
use crate::handlers::HostRequest;
use crate::platform::macos::app::state::{with_engine, STORE};
use crate::platform::macos::ffi::bridge::{
    autoreleasepool, class, id, msg_send, nil, nsstring, sel, AnyClass, AnyObject, ClassBuilder,
    NSApp, Sel, NO, YES,
};
use crate::platform::macos::ui::{action_selector, open_settings_file, show_about_dialog};

const CLASS_NAME: &CStr = c"MouseCrossController";
const HEARTBEAT_SECS: f64 = 0.25;

/// Controller pointer, readable from the waker's thread.
static CONTROLLER: AtomicUsize = AtomicUsize::new(0);

unsafe fn controller_class() -> Option<&'static AnyClass> {
    if let Some(cls) = AnyClass::get(CLASS_NAME) {
        return Some(cls);
    }
    let mut builder = ClassBuilder::new(CLASS_NAME, class!(NSObject))?;
    builder.add_method(sel!(pump:), pump as extern "C-unwind" fn(_, _, _));
    builder.add_method(
        action_selector(TrayAction::Toggle),
        toggle_crosshair as extern "C-unwind" fn(_, _, _),
    );
    builder.add_method(
        action_selector(TrayAction::Settings),
        open_settings as extern "C-unwind" fn(_, _, _),
    );
    builder.add_method(
        action_selector(TrayAction::About),
        show_about as extern "C-unwind" fn(_, _, _),
    );
    builder.add_method(
        action_selector(TrayAction::Quit),
        quit_app as extern "C-unwind" fn(_, _, _),
    );
    Some(builder.register())
}

/// Create the controller. It lives until the process exits.
///
/// # Safety
/// Main thread only.
pub unsafe fn create_controller() -> Option<id> {
    let cls = controller_class()?;
    let controller: id = msg_send![cls, new];
    if controller == nil {
        return None;
    }
    CONTROLLER.store(controller as usize, Ordering::Release);
    Some(controller)
}

/// Bus waker: schedule a pump on the main thread. Safe from any thread.
pub fn wake_loop() {
    let raw = CONTROLLER.load(Ordering::Acquire);
    if raw == 0 {
        return;
    }
    let controller = raw as id;
    autoreleasepool(|_| unsafe {
        let _: () = msg_send![
            controller,
            performSelectorOnMainThread: sel!(pump:),
            withObject: nil,
            waitUntilDone: NO
        ];
    });
}

/// Pump on a timer too, in common modes so menus and alerts do not stall it.
///
/// # Safety
/// Main thread only.
pub unsafe fn start_heartbeat(controller: id) {
    let timer: id = msg_send![
        class!(NSTimer),
        timerWithTimeInterval: HEARTBEAT_SECS,
        target: controller,
        selector: sel!(pump:),
        userInfo: nil,
        repeats: YES
    ];
    let run_loop: id = msg_send![class!(NSRunLoop), mainRunLoop];
    let mode = nsstring("kCFRunLoopCommonModes");
    let _: () = msg_send![run_loop, addTimer: timer, forMode: &*mode];
}

extern "C-unwind" fn pump(_this: &AnyObject, _cmd: Sel, _sender: id) {
    let Some(requests) = with_engine(|engine| engine.pump()) else {
        return;
    };
    for request in requests {
        execute(request);
    }
}

fn execute(request: HostRequest) {
    debug!(?request, "host request");
    unsafe {
        match request {
            HostRequest::OpenSettings => STORE.with(|s| {
                if let Some(store) = s.borrow().as_ref() {
                    open_settings_file(store);
                }
            }),
            HostRequest::ShowAbout => {
                let hotkey =
                    with_engine(|engine| engine.active_binding().map(|b| b.to_string())).flatten();
                show_about_dialog(hotkey.as_deref());
            }
            HostRequest::Quit => {
                info!("quit requested");
                let _: () = msg_send![NSApp(), terminate: nil];
            }
        }
    }
}

extern "C-unwind" fn toggle_crosshair(_this: &AnyObject, _cmd: Sel, _sender: id) {
    events::publish(AppEvent::TrayMenu(TrayAction::Toggle));
}

extern "C-unwind" fn open_settings(_this: &AnyObject, _cmd: Sel, _sender: id) {
    events::publish(AppEvent::TrayMenu(TrayAction::Settings));
}

extern "C-unwind" fn show_about(_this: &AnyObject, _cmd: Sel, _sender: id) {
    events::publish(AppEvent::TrayMenu(TrayAction::About));
}

extern "C-unwind" fn quit_app(_this: &AnyObject, _cmd: Sel, _sender: id) {
    events::publish(AppEvent::TrayMenu(TrayAction::Quit));
}
