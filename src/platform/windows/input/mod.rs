//! Pointer and display queries for Windows.
//!
//! The hotkey itself is handled by the cross-platform
//! [`GlobalHotKeyRegistrar`](crate::input::GlobalHotKeyRegistrar), whose
//! hidden window is serviced by the run loop's message pump.

pub mod pointer;

pub use pointer::{WinCursor, WinDisplays};
