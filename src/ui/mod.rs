//! User interface module.
//!
//! Platform-independent halves of the two visible components, plus the
//! About text:
//!
//! ## overlay/
//! - `OverlaySurface` capability trait and the idempotent `SurfaceDriver`
//!
//! ## tray/
//! - `TrayController`: labels, icon, gestures, menu layout
//! - icon.rs: tray icon rasteriser

pub mod about;
pub mod overlay;
pub mod tray;

pub use about::{about_text, ABOUT_TITLE};
pub use overlay::{OverlaySurface, SurfaceDriver, UnavailableSurface};
pub use tray::{
    menu_entries, toggle_label, ClickFilter, MenuEntry, TrayButton, TrayController, TrayIcon,
    TrayPresenter,
};
