//! objc2 aliases and runtime helpers shared by the macOS backend.
//!
//! Most AppKit calls here go through `msg_send!` on raw `id` pointers; the
//! objects involved (windows, views, status item) live for the whole run.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

use std::ffi::CStr;

pub use objc2::rc::{autoreleasepool, Retained};
pub use objc2::runtime::{AnyClass, AnyObject, Bool, ClassBuilder, Sel};
pub use objc2::{class, msg_send, sel};
pub use objc2_app_kit::{NSBackingStoreType, NSWindowCollectionBehavior, NSWindowStyleMask};
pub use objc2_core_foundation::CGFloat;
pub use objc2_foundation::{NSPoint, NSRect, NSSize, NSString};

use objc2::encode::Encode;

/// Objective-C object pointer.
pub type id = *mut AnyObject;

pub const nil: id = std::ptr::null_mut();

/// Objective-C BOOL, not Rust bool.
pub const YES: Bool = Bool::YES;
pub const NO: Bool = Bool::NO;

/// The shared NSApplication instance.
#[inline]
#[allow(non_snake_case)]
pub fn NSApp() -> id {
    unsafe { msg_send![class!(NSApplication), sharedApplication] }
}

#[inline]
pub fn nsstring(s: &str) -> Retained<NSString> {
    NSString::from_str(s)
}

/// Typed instance variable access.
pub trait ObjectExt {
    /// # Safety
    /// The ivar, if present, must hold a `T`.
    unsafe fn ivar<T: Encode + Copy>(&self, name: &CStr) -> Option<T>;

    /// # Safety
    /// The ivar, if present, must hold a `T`. Returns false if missing.
    unsafe fn set_ivar<T: Encode>(&mut self, name: &CStr, value: T) -> bool;
}

impl ObjectExt for AnyObject {
    unsafe fn ivar<T: Encode + Copy>(&self, name: &CStr) -> Option<T> {
        let ivar = self.class().instance_variable(name)?;
        Some(*ivar.load::<T>(self))
    }

    unsafe fn set_ivar<T: Encode>(&mut self, name: &CStr, value: T) -> bool {
        let Some(ivar) = self.class().instance_variable(name) else {
            return false;
        };
        *ivar.load_mut::<T>(self) = value;
        true
    }
}
