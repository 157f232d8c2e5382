//! Windows implementation using Win32 and Direct2D.
//!
//! - app/: run loop and thread-local engine
//! - handlers/: host window procedure and host requests
//! - input/: pointer and monitor queries
//! - ui/: layered overlay window, tray icon, dialogs

pub mod app;
pub mod ffi;
pub mod handlers;
pub mod input;
pub mod ui;

pub use app::run;
