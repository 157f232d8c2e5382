//! Rendering parameters for the crosshair (pure Rust, no FFI).

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::constants::*;
use crate::{clamp, finite_or};

/// Marker drawn periodically along each arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Circle,
    /// Arrowhead pointing back toward the pointer.
    ArrowToCenter,
    Cross,
    Diamond,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::ArrowToCenter,
        ShapeKind::Cross,
        ShapeKind::Diamond,
    ];
}

/// Immutable snapshot of everything the geometry builder needs.
///
/// Replaced wholesale when settings change; the dispatcher never edits a
/// live config in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Arm width in device-independent pixels.
    pub line_width_base: f64,
    /// Gap between the pointer and the start of each arm.
    pub cursor_offset: f64,
    /// Fractional thickness increase per unit of distance along an arm.
    pub thickness_growth: f64,
    /// Opacity in [0, 1].
    pub opacity: f64,
    pub color: Rgb,
    pub direction_shapes_enabled: bool,
    pub direction_shape_kind: ShapeKind,
    /// Fractional increase of the gap between successive shapes.
    pub shape_spacing_growth: f64,
    /// Draw an inverted-colour core line inside each arm.
    pub contrast_line: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            line_width_base: DEFAULT_LINE_WIDTH,
            cursor_offset: DEFAULT_CURSOR_OFFSET,
            thickness_growth: DEFAULT_THICKNESS_GROWTH,
            opacity: DEFAULT_OPACITY,
            color: Rgb::new(DEFAULT_COLOR.0, DEFAULT_COLOR.1, DEFAULT_COLOR.2),
            direction_shapes_enabled: true,
            direction_shape_kind: ShapeKind::Circle,
            shape_spacing_growth: DEFAULT_SHAPE_SPACING_GROWTH,
            contrast_line: true,
        }
    }
}

impl AppearanceConfig {
    /// Returns a copy with every value clamped to its valid range.
    ///
    /// Non-finite values fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            line_width_base: clamp(
                finite_or(self.line_width_base, d.line_width_base),
                MIN_LINE_WIDTH,
                MAX_LINE_WIDTH,
            ),
            cursor_offset: clamp(
                finite_or(self.cursor_offset, d.cursor_offset),
                0.0,
                MAX_CURSOR_OFFSET,
            ),
            thickness_growth: clamp(
                finite_or(self.thickness_growth, d.thickness_growth),
                0.0,
                MAX_THICKNESS_GROWTH,
            ),
            opacity: clamp(finite_or(self.opacity, d.opacity), 0.0, 1.0),
            shape_spacing_growth: clamp(
                finite_or(self.shape_spacing_growth, d.shape_spacing_growth),
                0.0,
                MAX_SHAPE_SPACING_GROWTH,
            ),
            ..self
        }
    }

    /// Colour of the contrast core line.
    pub fn contrast_color(&self) -> Rgb {
        self.color.inverted()
    }
}
