//! NSScreen geometry.
//!
//! AppKit frames have their origin at the bottom-left of the primary screen
//! with y up. The crosshair works in CoreGraphics global coordinates (origin
//! top-left of the primary display, y down), the same space as
//! `CGEventGetLocation` and `CGDisplayBounds`.

use crate::model::Rect;

use super::bridge::{class, id, msg_send, nil, NSRect};

/// Window level slightly above context menus and the Dock.
pub fn overlay_window_level() -> isize {
    202
}

/// One screen's AppKit frame and its rectangle in CG global coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ScreenFrame {
    pub screen: id,
    pub appkit: NSRect,
    pub global: Rect,
}

/// Flip an AppKit frame into CG global coordinates.
pub fn appkit_to_global(frame: NSRect, primary_height: f64) -> Rect {
    Rect::new(
        frame.origin.x,
        primary_height - (frame.origin.y + frame.size.height),
        frame.size.width,
        frame.size.height,
    )
}

/// All screens, primary first.
///
/// # Safety
/// Main thread only.
pub unsafe fn screen_frames() -> Vec<ScreenFrame> {
    let screens: id = msg_send![class!(NSScreen), screens];
    if screens == nil {
        return Vec::new();
    }
    let count: usize = msg_send![screens, count];
    let mut frames = Vec::with_capacity(count);
    let mut primary_height = 0.0;
    for i in 0..count {
        let screen: id = msg_send![screens, objectAtIndex: i];
        let appkit: NSRect = msg_send![screen, frame];
        if i == 0 {
            primary_height = appkit.size.height;
        }
        frames.push(ScreenFrame {
            screen,
            appkit,
            global: appkit_to_global(appkit, primary_height),
        });
    }
    frames
}
