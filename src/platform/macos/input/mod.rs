//! Input handling module.
//!
//! - pointer.rs: CoreGraphics pointer and display queries
//! - observers.rs: notification observers (screen changes, wake, termination)
//!
//! The toggle hotkey goes through the cross-platform
//! [`GlobalHotKeyRegistrar`](crate::input::GlobalHotKeyRegistrar).

pub mod observers;
pub mod pointer;

pub use observers::{install_display_observers, install_termination_observer};
pub use pointer::{MacCursor, MacDisplays};
