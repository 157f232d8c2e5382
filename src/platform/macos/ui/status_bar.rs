//! Menu bar item.
//!
//! The status item's menu mirrors [`menu_entries`]; every entry targets the
//! application controller, which turns the click into a `TrayMenu` event.
//! Clicking the item opens the menu, so there are no icon gestures here.

use tracing::{debug, warn};

use crate::app::VisibilityState;
use crate::events::TrayAction;
use crate::platform::macos::ffi::bridge::{
    class, id, msg_send, nil, nsstring, sel, CGFloat, Sel, NSSize, NO, YES,
};
use crate::ui::{menu_entries, MenuEntry, TrayIcon, TrayPresenter};

// NSBitmapFormatAlphaNonpremultiplied
const ALPHA_NONPREMULTIPLIED: usize = 1 << 1;
const MENU_BAR_ICON_SIZE: CGFloat = 18.0;

/// Controller selector for a menu action.
pub fn action_selector(action: TrayAction) -> Sel {
    match action {
        TrayAction::Toggle => sel!(toggleCrosshair:),
        TrayAction::Settings => sel!(openSettings:),
        TrayAction::About => sel!(showAbout:),
        TrayAction::Quit => sel!(quitApp:),
    }
}

pub struct MacStatusItem {
    item: id,
    toggle_item: id,
}

impl MacStatusItem {
    /// Install the item in the system status bar.
    ///
    /// # Safety
    /// Main thread, after NSApplication exists. `target` must outlive the item.
    pub unsafe fn install(target: id) -> Self {
        let status_bar: id = msg_send![class!(NSStatusBar), systemStatusBar];
        // NSVariableStatusItemLength = -1.0
        let item: id = msg_send![status_bar, statusItemWithLength: -1.0f64];
        let _: id = msg_send![item, retain];

        let menu: id = msg_send![class!(NSMenu), alloc];
        let menu: id = msg_send![menu, init];
        let _: () = msg_send![menu, setAutoenablesItems: NO];

        let mut toggle_item = nil;
        for entry in menu_entries(VisibilityState::Hidden) {
            match entry {
                MenuEntry::Separator => {
                    let separator: id = msg_send![class!(NSMenuItem), separatorItem];
                    let _: () = msg_send![menu, addItem: separator];
                }
                MenuEntry::Item { action, label } => {
                    let title = nsstring(&label);
                    let empty = nsstring("");
                    let menu_item: id = msg_send![class!(NSMenuItem), alloc];
                    let menu_item: id = msg_send![
                        menu_item,
                        initWithTitle: &*title,
                        action: action_selector(action),
                        keyEquivalent: &*empty
                    ];
                    let _: () = msg_send![menu_item, setTarget: target];
                    let _: () = msg_send![menu, addItem: menu_item];
                    if action == TrayAction::Toggle {
                        toggle_item = menu_item;
                    } else {
                        let _: () = msg_send![menu_item, release];
                    }
                }
            }
        }
        let _: () = msg_send![item, setMenu: menu];
        let _: () = msg_send![menu, release];

        debug!("status item installed");
        Self { item, toggle_item }
    }

    unsafe fn button(&self) -> id {
        msg_send![self.item, button]
    }
}

impl TrayPresenter for MacStatusItem {
    fn set_toggle_label(&mut self, label: &str) {
        if self.toggle_item == nil {
            return;
        }
        let title = nsstring(label);
        unsafe {
            let _: () = msg_send![self.toggle_item, setTitle: &*title];
        }
    }

    fn set_icon(&mut self, icon: &TrayIcon) {
        unsafe {
            let button = self.button();
            if button == nil {
                return;
            }
            match make_image(icon) {
                Some(image) => {
                    let _: () = msg_send![button, setImage: image];
                    let _: () = msg_send![image, release];
                }
                None => {
                    let fallback = nsstring("+");
                    let _: () = msg_send![button, setTitle: &*fallback];
                }
            }
        }
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        let text = nsstring(tooltip);
        unsafe {
            let button = self.button();
            if button != nil {
                let _: () = msg_send![button, setToolTip: &*text];
            }
        }
    }

    fn notify(&mut self, title: &str, message: &str) {
        unsafe {
            let center: id = msg_send![class!(NSUserNotificationCenter), defaultUserNotificationCenter];
            if center == nil {
                warn!(%title, %message, "notification center unavailable");
                return;
            }
            let note: id = msg_send![class!(NSUserNotification), alloc];
            let note: id = msg_send![note, init];
            let title = nsstring(title);
            let body = nsstring(message);
            let _: () = msg_send![note, setTitle: &*title];
            let _: () = msg_send![note, setInformativeText: &*body];
            let _: () = msg_send![center, deliverNotification: note];
            let _: () = msg_send![note, release];
        }
    }
}

impl Drop for MacStatusItem {
    fn drop(&mut self) {
        unsafe {
            let status_bar: id = msg_send![class!(NSStatusBar), systemStatusBar];
            let _: () = msg_send![status_bar, removeStatusItem: self.item];
            if self.toggle_item != nil {
                let _: () = msg_send![self.toggle_item, release];
            }
            let _: () = msg_send![self.item, release];
        }
    }
}

/// NSImage (+1) from a straight RGBA bitmap.
unsafe fn make_image(icon: &TrayIcon) -> Option<id> {
    let width = icon.width as isize;
    let height = icon.height as isize;
    let color_space = nsstring("NSDeviceRGBColorSpace");
    let planes: *mut *mut u8 = std::ptr::null_mut();

    let rep: id = msg_send![class!(NSBitmapImageRep), alloc];
    let rep: id = msg_send![
        rep,
        initWithBitmapDataPlanes: planes,
        pixelsWide: width,
        pixelsHigh: height,
        bitsPerSample: 8isize,
        samplesPerPixel: 4isize,
        hasAlpha: YES,
        isPlanar: NO,
        colorSpaceName: &*color_space,
        bitmapFormat: ALPHA_NONPREMULTIPLIED,
        bytesPerRow: width * 4,
        bitsPerPixel: 32isize
    ];
    if rep == nil {
        return None;
    }
    let data: *mut u8 = msg_send![rep, bitmapData];
    if data.is_null() {
        let _: () = msg_send![rep, release];
        return None;
    }
    std::ptr::copy_nonoverlapping(icon.rgba.as_ptr(), data, icon.rgba.len());

    let image: id = msg_send![class!(NSImage), alloc];
    let size = NSSize::new(MENU_BAR_ICON_SIZE, MENU_BAR_ICON_SIZE);
    let image: id = msg_send![image, initWithSize: size];
    let _: () = msg_send![image, addRepresentation: rep];
    let _: () = msg_send![rep, release];
    Some(image)
}
