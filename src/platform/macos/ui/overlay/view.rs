//! MouseCrossView: the NSView subclass that paints the crosshair.
//!
//! One view per screen. Each view stores the CG global origin of its screen
//! in ivars and is flipped (y down), so drawing a geometry is a plain
//! translation. The geometry itself is held in a thread-local and shared by
//! every view.

use std::cell::RefCell;
use std::ffi::CStr;

use crate::geometry::CrosshairGeometry;
use crate::model::Point;
use crate::platform::macos::ffi::bridge::{
    class, id, msg_send, nil, sel, AnyClass, AnyObject, Bool, ClassBuilder, NSPoint, NSRect,
    ObjectExt, Sel, YES,
};
use crate::platform::macos::ffi::ScreenFrame;

use super::drawing::draw_geometry;

const CLASS_NAME: &CStr = c"MouseCrossView";
const ORIGIN_X: &CStr = c"_originX";
const ORIGIN_Y: &CStr = c"_originY";

thread_local! {
    static FRAME: RefCell<Option<CrosshairGeometry>> = const { RefCell::new(None) };
}

/// Replace the geometry every view draws (`None` draws nothing).
pub fn set_frame(geometry: Option<CrosshairGeometry>) {
    FRAME.with(|f| *f.borrow_mut() = geometry);
}

/// Register the class on first use.
///
/// # Safety
/// Main thread only.
unsafe fn view_class() -> Option<&'static AnyClass> {
    if let Some(cls) = AnyClass::get(CLASS_NAME) {
        return Some(cls);
    }
    let mut builder = ClassBuilder::new(CLASS_NAME, class!(NSView))?;
    builder.add_ivar::<f64>(ORIGIN_X);
    builder.add_ivar::<f64>(ORIGIN_Y);
    builder.add_method(
        sel!(drawRect:),
        draw_rect as unsafe extern "C-unwind" fn(_, _, _),
    );
    builder.add_method(
        sel!(isFlipped),
        is_flipped as extern "C-unwind" fn(_, _) -> _,
    );
    Some(builder.register())
}

/// Create a view covering `frame` and install it as the window's content.
///
/// Returns the view with the caller's +1 reference.
///
/// # Safety
/// Main thread only; `window` must be a valid NSWindow.
pub unsafe fn create_view(window: id, frame: &ScreenFrame) -> Option<id> {
    let cls = view_class()?;
    let view: id = msg_send![cls, alloc];
    let bounds = NSRect::new(NSPoint::new(0.0, 0.0), frame.appkit.size);
    let view: id = msg_send![view, initWithFrame: bounds];
    if view == nil {
        return None;
    }
    (*view).set_ivar::<f64>(ORIGIN_X, frame.global.x);
    (*view).set_ivar::<f64>(ORIGIN_Y, frame.global.y);
    let _: () = msg_send![window, setContentView: view];
    Some(view)
}

unsafe extern "C-unwind" fn draw_rect(this: &AnyObject, _cmd: Sel, _dirty: NSRect) {
    let origin = Point::new(
        this.ivar::<f64>(ORIGIN_X).unwrap_or(0.0),
        this.ivar::<f64>(ORIGIN_Y).unwrap_or(0.0),
    );
    FRAME.with(|f| {
        if let Some(geometry) = f.borrow().as_ref() {
            draw_geometry(geometry, origin);
        }
    });
}

extern "C-unwind" fn is_flipped(_this: &AnyObject, _cmd: Sel) -> Bool {
    YES
}
