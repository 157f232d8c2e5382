#![allow(unexpected_cfgs)] // Silence cfg warnings from objc macros

//! MouseCross: a full-screen crosshair that follows the mouse pointer.
//!
//! Everything outside [`platform`] is pure Rust and runs on any OS, so the
//! geometry, visibility and dispatch logic are covered by normal tests. The
//! platform backends implement the capability traits
//! ([`ui::OverlaySurface`], [`ui::TrayPresenter`], [`input::CursorSource`],
//! [`input::HotkeyRegistrar`], [`handlers::DisplaySource`]).

pub mod app;
pub mod error;
pub mod events;
pub mod geometry;
pub mod handlers;
pub mod input;
pub mod logging;
pub mod model;
pub mod platform;
pub mod storage;
pub mod ui;

// Re-export the types most callers need
pub use app::VisibilityState;
pub use error::{CoreError, FeatureFault};
pub use events::{AppEvent, EventBus, EventPublisher};
pub use geometry::{CrosshairGeometry, CursorSample};
pub use handlers::{Engine, HostRequest, PlatformParts, StatusEvent};
pub use model::{AppearanceConfig, BehaviorConfig, Settings, ShapeKind};

/// Clamp a value to [lo, hi]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// `v` if finite, otherwise `fallback`.
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
