//! macOS backend on AppKit via objc2.
//!
//! - ffi: objc2 helpers, screen geometry, accessibility check
//! - input: pointer and display queries, notification observers
//! - ui: overlay windows, menu bar item, dialogs
//! - handlers: controller object that pumps the engine
//! - app: NSApplication setup and the run loop

pub mod app;
pub mod ffi;
pub mod handlers;
pub mod input;
pub mod ui;

pub use app::run;
