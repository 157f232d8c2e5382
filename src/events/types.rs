//! Application events for inter-module communication.
//!
//! These events are published by OS callbacks (hotkey thread, tray window
//! procedure, sampling thread, settings watcher) and handled on the single
//! coordinating loop by [`crate::handlers::Engine`].
//! This module is pure Rust with no FFI dependencies, making it fully testable.

use std::time::Instant;

use crate::error::FeatureFault;
use crate::geometry::CursorSample;
use crate::model::Settings;

/// Where a toggle request came from. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSource {
    Hotkey,
    TrayClick,
    TrayMenu,
    /// `Engine::toggle_visibility` or a dialog.
    Api,
}

/// Physical key edge reported by the hotkey backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Gesture on the tray icon itself (not the menu).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayGesture {
    Click,
    DoubleClick,
}

/// Tray context-menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Toggle,
    Settings,
    About,
    Quit,
}

/// Application-level events for decoupled communication between modules.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // === Toggle Sources ===
    /// Explicit toggle request.
    ToggleVisibility(ToggleSource),

    /// Raw hotkey edge, stamped when the OS reported it; debounced by the
    /// listener before it toggles.
    Hotkey {
        id: u32,
        state: KeyState,
        at: Instant,
    },

    /// Click or double-click on the tray icon.
    Tray(TrayGesture),

    /// Tray context-menu selection.
    TrayMenu(TrayAction),

    // === Tracking ===
    /// New pointer sample from the tracker session `session`.
    CursorMoved { session: u64, sample: CursorSample },

    /// Pointer is outside every known monitor.
    CursorLost { session: u64 },

    // === System Events ===
    /// Monitors added, removed, moved or rescaled.
    DisplaysChanged,

    /// Settings collaborator published a new snapshot.
    SettingsChanged(Box<Settings>),

    /// A backend hit a feature-fatal condition.
    FeatureFailed(FeatureFault),

    /// Leave the run loop.
    Quit,
}

impl AppEvent {
    /// Returns true for events that may flip visibility.
    pub fn is_toggle_source(&self) -> bool {
        matches!(
            self,
            AppEvent::ToggleVisibility(_)
                | AppEvent::Hotkey { .. }
                | AppEvent::Tray(_)
                | AppEvent::TrayMenu(TrayAction::Toggle)
        )
    }

    /// Returns a human-readable description of the event for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            AppEvent::ToggleVisibility(_) => "Toggle crosshair visibility",
            AppEvent::Hotkey { .. } => "Global hotkey edge",
            AppEvent::Tray(_) => "Tray icon gesture",
            AppEvent::TrayMenu(TrayAction::Toggle) => "Tray menu: toggle",
            AppEvent::TrayMenu(TrayAction::Settings) => "Tray menu: settings",
            AppEvent::TrayMenu(TrayAction::About) => "Tray menu: about",
            AppEvent::TrayMenu(TrayAction::Quit) => "Tray menu: quit",
            AppEvent::CursorMoved { .. } => "Pointer moved",
            AppEvent::CursorLost { .. } => "Pointer outside all monitors",
            AppEvent::DisplaysChanged => "Display configuration changed",
            AppEvent::SettingsChanged(_) => "Settings changed",
            AppEvent::FeatureFailed(_) => "Crosshair feature failed",
            AppEvent::Quit => "Quit application",
        }
    }
}
