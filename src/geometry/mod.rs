//! Crosshair geometry: pointer samples in, drawable primitives out.
//!
//! Everything here is pure. [`build`] is deterministic, so identical inputs
//! always produce identical (`==`) geometry, which the renderers and the
//! tests both rely on.

pub mod builder;

use std::time::Instant;

use crate::model::{MonitorId, Point, Rgb, ShapeKind};

pub use builder::{build, thickness_at};

/// One pointer observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample {
    pub x: f64,
    pub y: f64,
    /// Monitor under the pointer.
    pub monitor: MonitorId,
    /// Surface pixels per device-independent pixel on that monitor.
    pub scale: f64,
    pub timestamp: Instant,
}

impl CursorSample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Arm direction, in desktop coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector pointing away from the pointer.
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
        }
    }
}

/// Colour plus opacity attached to every primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub opacity: f64,
}

/// Straight stroke of constant width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub paint: Paint,
}

/// Direction shape placed along an arm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: ShapeKind,
    pub center: Point,
    /// Half of the marker's extent.
    pub half_size: f64,
    /// Stroke width for outline shapes (Cross).
    pub stroke_width: f64,
    /// Unit vector from the marker back to the pointer.
    pub toward_cursor: (f64, f64),
    /// Distance from the pointer.
    pub distance: f64,
    pub paint: Paint,
}

impl Marker {
    /// Closed polygon for filled shapes (ArrowToCenter, Diamond).
    ///
    /// Returns an empty list for Circle and Cross.
    pub fn polygon(&self) -> Vec<Point> {
        let (dx, dy) = self.toward_cursor;
        let (px, py) = (-dy, dx);
        let c = self.center;
        let h = self.half_size;
        match self.kind {
            ShapeKind::ArrowToCenter => vec![
                Point::new(c.x + dx * h, c.y + dy * h),
                Point::new(c.x - dx * h + px * h, c.y - dy * h + py * h),
                Point::new(c.x - dx * h - px * h, c.y - dy * h - py * h),
            ],
            ShapeKind::Diamond => vec![
                Point::new(c.x + dx * h, c.y + dy * h),
                Point::new(c.x + px * h, c.y + py * h),
                Point::new(c.x - dx * h, c.y - dy * h),
                Point::new(c.x - px * h, c.y - py * h),
            ],
            ShapeKind::Circle | ShapeKind::Cross => Vec::new(),
        }
    }

    /// The two strokes of a Cross marker, rotated 45° to the arm.
    pub fn cross_strokes(&self) -> [(Point, Point); 2] {
        let c = self.center;
        let h = self.half_size * std::f64::consts::FRAC_1_SQRT_2;
        [
            (Point::new(c.x - h, c.y - h), Point::new(c.x + h, c.y + h)),
            (Point::new(c.x - h, c.y + h), Point::new(c.x + h, c.y - h)),
        ]
    }
}

/// One crosshair arm with its tapered body, optional core line and markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Arm {
    pub direction: Direction,
    pub start: Point,
    pub end: Point,
    /// Body, ordered from the pointer outward.
    pub segments: Vec<Segment>,
    /// Contrast core line over the body (empty when disabled).
    pub core: Vec<Segment>,
    /// Direction shapes, ordered from the pointer outward.
    pub markers: Vec<Marker>,
}

impl Arm {
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }
}

/// Drawable item in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Line(&'a Segment),
    Shape(&'a Marker),
}

/// Output of [`build`]. Disposable; rebuilt on every sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrosshairGeometry {
    pub cursor: Point,
    pub arms: Vec<Arm>,
}

impl CrosshairGeometry {
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Primitives in paint order: every body, then every core line, then markers.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive<'_>> + '_ {
        let bodies = self.arms.iter().flat_map(|a| a.segments.iter()).map(Primitive::Line);
        let cores = self.arms.iter().flat_map(|a| a.core.iter()).map(Primitive::Line);
        let shapes = self.arms.iter().flat_map(|a| a.markers.iter()).map(Primitive::Shape);
        bodies.chain(cores).chain(shapes)
    }

    pub fn arm(&self, direction: Direction) -> Option<&Arm> {
        self.arms.iter().find(|a| a.direction == direction)
    }
}
