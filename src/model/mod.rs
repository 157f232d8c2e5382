//! Application domain model.
//!
//! This module contains pure data types (no FFI dependencies): appearance
//! and behaviour configuration, display layout and configuration constants.
//!
//! Persistence lives in [`crate::storage`].

pub mod appearance;
pub mod behavior;
pub mod color;
pub mod constants;
pub mod display;

pub use appearance::{AppearanceConfig, ShapeKind};
pub use behavior::{BehaviorConfig, Settings, TrayActivation};
pub use color::Rgb;
pub use constants::*;
pub use display::{DisplayLayout, MonitorId, MonitorInfo, Point, Rect};
