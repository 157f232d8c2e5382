//! FFI helpers for macOS frameworks.
//!
//! - bridge: objc2 aliases and small runtime helpers
//! - accessibility: TCC trust check
//! - screens: NSScreen frames in CoreGraphics global coordinates

pub mod accessibility;
pub mod bridge;
pub mod screens;

pub use accessibility::accessibility_trusted;
pub use screens::{overlay_window_level, screen_frames, ScreenFrame};
