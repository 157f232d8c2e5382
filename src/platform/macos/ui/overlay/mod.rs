//! Overlay windows for macOS.
//!
//! One borderless, transparent, click-through window per screen at a level
//! above menus, joining all Spaces and full-screen apps.

pub mod drawing;
pub mod view;

use tracing::debug;

use crate::error::CoreError;
use crate::geometry::CrosshairGeometry;
use crate::model::Rect;
use crate::platform::macos::ffi::bridge::{
    class, id, msg_send, nil, NSBackingStoreType, NSWindowCollectionBehavior, NSWindowStyleMask,
    NO, YES,
};
use crate::platform::macos::ffi::{overlay_window_level, screen_frames, ScreenFrame};
use crate::ui::OverlaySurface;

pub use view::set_frame;

struct OverlayWindow {
    window: id,
    view: id,
}

#[derive(Default)]
pub struct MacSurface {
    windows: Vec<OverlayWindow>,
    shown: bool,
}

impl MacSurface {
    pub fn new() -> Self {
        Self::default()
    }

    unsafe fn rebuild(&mut self) -> Result<(), CoreError> {
        self.teardown();
        let frames = screen_frames();
        if frames.is_empty() {
            return Err(CoreError::DisplayReconfiguration("no screens attached".into()));
        }
        for frame in &frames {
            let window = make_window(frame)?;
            let Some(view) = view::create_view(window, frame) else {
                let _: () = msg_send![window, close];
                let _: () = msg_send![window, release];
                return Err(CoreError::RenderSurfaceUnavailable(
                    "could not create the overlay view".into(),
                ));
            };
            if self.shown {
                let _: () = msg_send![window, orderFrontRegardless];
            }
            self.windows.push(OverlayWindow { window, view });
        }
        debug!(screens = frames.len(), "overlay windows created");
        Ok(())
    }

    unsafe fn teardown(&mut self) {
        for w in self.windows.drain(..) {
            let _: () = msg_send![w.window, orderOut: nil];
            let _: () = msg_send![w.window, close];
            let _: () = msg_send![w.view, release];
            let _: () = msg_send![w.window, release];
        }
    }

    unsafe fn redraw(&self) {
        for w in &self.windows {
            let _: () = msg_send![w.view, setNeedsDisplay: YES];
        }
    }
}

impl OverlaySurface for MacSurface {
    fn show(&mut self) -> Result<(), CoreError> {
        self.shown = true;
        unsafe {
            if self.windows.is_empty() {
                return self.rebuild();
            }
            for w in &self.windows {
                let _: () = msg_send![w.window, orderFrontRegardless];
            }
        }
        Ok(())
    }

    fn hide(&mut self) -> Result<(), CoreError> {
        self.shown = false;
        set_frame(None);
        unsafe {
            for w in &self.windows {
                let _: () = msg_send![w.window, orderOut: nil];
            }
            self.redraw();
        }
        Ok(())
    }

    fn render(&mut self, geometry: &CrosshairGeometry) -> Result<(), CoreError> {
        set_frame(Some(geometry.clone()));
        unsafe { self.redraw() };
        Ok(())
    }

    fn resize_to_desktop(&mut self, _bounds: Rect) -> Result<(), CoreError> {
        // Screens are per-window here; rebuild from the current NSScreen list
        unsafe { self.rebuild() }
    }
}

impl Drop for MacSurface {
    fn drop(&mut self) {
        unsafe { self.teardown() };
    }
}

/// Transparent overlay window for one screen.
unsafe fn make_window(frame: &ScreenFrame) -> Result<id, CoreError> {
    let window: id = msg_send![class!(NSWindow), alloc];
    let window: id = msg_send![
        window,
        initWithContentRect: frame.appkit,
        styleMask: NSWindowStyleMask::Borderless,
        backing: NSBackingStoreType::Buffered,
        defer: NO
    ];
    if window == nil {
        return Err(CoreError::RenderSurfaceUnavailable(
            "could not create the overlay window".into(),
        ));
    }

    let _: () = msg_send![window, setReleasedWhenClosed: NO];
    let _: () = msg_send![window, setOpaque: NO];
    let _: () = msg_send![window, setHasShadow: NO];
    let clear_color: id = msg_send![class!(NSColor), clearColor];
    let _: () = msg_send![window, setBackgroundColor: clear_color];
    let _: () = msg_send![window, setIgnoresMouseEvents: YES];
    let _: () = msg_send![window, setLevel: overlay_window_level()];

    let collection_behavior = NSWindowCollectionBehavior::CanJoinAllSpaces
        | NSWindowCollectionBehavior::Stationary
        | NSWindowCollectionBehavior::FullScreenAuxiliary;
    let _: () = msg_send![window, setCollectionBehavior: collection_behavior];

    Ok(window)
}
