//! Configuration constants and default values.
//!
//! This module contains all application constants including visual defaults,
//! behaviour defaults, geometry limits and validation limits.

use std::time::Duration;

// === Visual Defaults ===

/// Default arm width in device-independent pixels.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Default gap between the pointer and the start of each arm.
pub const DEFAULT_CURSOR_OFFSET: f64 = 10.0;

/// Default fractional thickness increase per unit of distance (≈3x at 1000 px).
pub const DEFAULT_THICKNESS_GROWTH: f64 = 0.002;

/// Default crosshair opacity.
pub const DEFAULT_OPACITY: f64 = 0.8;

/// Default crosshair colour (R, G, B) - red.
pub const DEFAULT_COLOR: (u8, u8, u8) = (255, 0, 0);

/// Default fractional gap increase between successive direction shapes.
pub const DEFAULT_SHAPE_SPACING_GROWTH: f64 = 0.05;

// === Behaviour Defaults ===

/// Default system-wide toggle combination.
pub const DEFAULT_HOTKEY: &str = "Ctrl+Alt+C";

/// Default cursor sampling interval (≈60 Hz).
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 16;

// === Validation Limits ===

/// Minimum arm width in device-independent pixels.
pub const MIN_LINE_WIDTH: f64 = 0.5;

/// Maximum arm width in device-independent pixels.
pub const MAX_LINE_WIDTH: f64 = 20.0;

/// Maximum gap around the pointer.
pub const MAX_CURSOR_OFFSET: f64 = 200.0;

/// Maximum per-unit thickness growth.
pub const MAX_THICKNESS_GROWTH: f64 = 0.1;

/// Maximum per-shape spacing growth.
pub const MAX_SHAPE_SPACING_GROWTH: f64 = 1.0;

/// Minimum sampling interval in milliseconds (250 Hz).
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 4;

/// Maximum sampling interval in milliseconds (10 Hz).
pub const MAX_SAMPLE_INTERVAL_MS: u64 = 100;

// === Geometry ===

/// Rendered arm thickness never exceeds this many surface pixels.
pub const MAX_ARM_THICKNESS: f64 = 48.0;

/// Rendered arm thickness never drops below one surface pixel.
pub const MIN_ARM_THICKNESS: f64 = 1.0;

/// Length of one tapered arm segment in surface pixels.
pub const ARM_SEGMENT_LENGTH: f64 = 16.0;

/// Upper bound on segments per arm.
pub const MAX_ARM_SEGMENTS: usize = 256;

/// First shape gap as a multiple of the scaled line width.
pub const SHAPE_BASE_SPACING_FACTOR: f64 = 6.0;

/// Upper bound on direction shapes per arm.
pub const MAX_SHAPES_PER_ARM: usize = 128;

/// Marker half-size as a multiple of the arm thickness where it sits.
pub const SHAPE_SIZE_FACTOR: f64 = 1.5;

// === Input ===

/// Minimum time between two accepted hotkey presses.
pub const HOTKEY_DEBOUNCE: Duration = Duration::from_millis(150);

// === Tray ===

pub const TRAY_TOOLTIP: &str = "MouseCross - Visual Mouse Locator";
pub const TRAY_LABEL_SHOW: &str = "Show Crosshair";
pub const TRAY_LABEL_HIDE: &str = "Hide Crosshair";
pub const TRAY_NOTIFY_TITLE: &str = "MouseCross";
pub const TRAY_NOTIFY_ACTIVATED: &str = "Crosshair activated";
pub const TRAY_NOTIFY_DEACTIVATED: &str = "Crosshair deactivated";

/// Tray icon edge in pixels.
pub const TRAY_ICON_SIZE: u32 = 16;

/// Tray icon colour while the crosshair is hidden.
pub const TRAY_HIDDEN_COLOR: (u8, u8, u8) = (128, 128, 128);

// === Storage ===

/// Directory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "MouseCross";

/// Settings file name.
pub const CONFIG_FILE_NAME: &str = "settings.json";

/// How often the settings watcher checks the file.
pub const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(1);
