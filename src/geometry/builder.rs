//! Builds crosshair geometry from a pointer sample.
//!
//! Distances along an arm are measured from the arm's start point (the edge
//! of the gap around the pointer), so the innermost segment is exactly
//! `line_width_base * scale` wide.

use super::{Arm, CrosshairGeometry, CursorSample, Direction, Marker, Paint, Segment};
use crate::model::constants::*;
use crate::model::{AppearanceConfig, Point, Rect};

/// Thickness at `distance` along an arm whose innermost width is `base`.
pub fn thickness_at(base: f64, growth: f64, distance: f64) -> f64 {
    (base * (1.0 + growth * distance)).clamp(MIN_ARM_THICKNESS, MAX_ARM_THICKNESS)
}

/// Computes the crosshair for `sample` spanning `desktop`.
///
/// Arms run to the virtual-desktop edges, not the current monitor's. An arm
/// whose length would be zero or negative (pointer within `cursor_offset`
/// of an edge) is omitted.
pub fn build(sample: &CursorSample, desktop: Rect, config: &AppearanceConfig) -> CrosshairGeometry {
    let cursor = sample.position();
    let scale = if sample.scale.is_finite() && sample.scale > 0.0 {
        sample.scale
    } else {
        1.0
    };
    let base = config.line_width_base * scale;
    let body = Paint {
        color: config.color,
        opacity: config.opacity,
    };
    let core_paint = Paint {
        color: config.contrast_color(),
        opacity: config.opacity,
    };

    let arms = Direction::ALL
        .iter()
        .filter_map(|&direction| {
            let reach = edge_distance(cursor, desktop, direction);
            let length = reach - config.cursor_offset;
            if !(length > 0.0) {
                return None;
            }
            let start = offset(cursor, direction, config.cursor_offset);
            let end = offset(cursor, direction, reach);
            let segments = arm_segments(start, direction, length, base, config.thickness_growth, body);
            let core = if config.contrast_line {
                segments
                    .iter()
                    .map(|s| Segment {
                        width: s.width / 2.0,
                        paint: core_paint,
                        ..*s
                    })
                    .collect()
            } else {
                Vec::new()
            };
            let markers = if config.direction_shapes_enabled {
                arm_markers(cursor, start, direction, length, base, config, body)
            } else {
                Vec::new()
            };
            Some(Arm {
                direction,
                start,
                end,
                segments,
                core,
                markers,
            })
        })
        .collect();

    CrosshairGeometry { cursor, arms }
}

fn edge_distance(cursor: Point, desktop: Rect, direction: Direction) -> f64 {
    match direction {
        Direction::Left => cursor.x - desktop.x,
        Direction::Right => desktop.right() - cursor.x,
        Direction::Up => cursor.y - desktop.y,
        Direction::Down => desktop.bottom() - cursor.y,
    }
}

fn offset(p: Point, direction: Direction, distance: f64) -> Point {
    let (dx, dy) = direction.unit();
    Point::new(p.x + dx * distance, p.y + dy * distance)
}

fn arm_segments(
    start: Point,
    direction: Direction,
    length: f64,
    base: f64,
    growth: f64,
    paint: Paint,
) -> Vec<Segment> {
    // A constant-width arm is a single stroke.
    let count = if growth == 0.0 {
        1
    } else {
        ((length / ARM_SEGMENT_LENGTH).ceil() as usize).clamp(1, MAX_ARM_SEGMENTS)
    };
    (0..count)
        .map(|i| {
            let near = length * i as f64 / count as f64;
            let far = length * (i + 1) as f64 / count as f64;
            Segment {
                from: offset(start, direction, near),
                to: offset(start, direction, far),
                width: thickness_at(base, growth, near),
                paint,
            }
        })
        .collect()
}

fn arm_markers(
    cursor: Point,
    start: Point,
    direction: Direction,
    length: f64,
    base: f64,
    config: &AppearanceConfig,
    paint: Paint,
) -> Vec<Marker> {
    let (dx, dy) = direction.unit();
    let base_spacing = SHAPE_BASE_SPACING_FACTOR * base;
    let ratio = 1.0 + config.shape_spacing_growth;
    let mut markers = Vec::new();
    let mut along = 0.0;
    for n in 0..MAX_SHAPES_PER_ARM {
        along += base_spacing * ratio.powi(n as i32);
        let thickness = thickness_at(base, config.thickness_growth, along);
        let half_size = thickness * SHAPE_SIZE_FACTOR;
        if along + half_size > length {
            break;
        }
        let center = offset(start, direction, along);
        markers.push(Marker {
            kind: config.direction_shape_kind,
            center,
            half_size,
            stroke_width: (thickness / 2.0).max(MIN_ARM_THICKNESS),
            toward_cursor: (-dx, -dy),
            distance: center.distance_to(cursor),
            paint,
        });
    }
    markers
}
