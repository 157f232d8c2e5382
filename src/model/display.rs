//! Monitor layout and virtual-desktop math.
//!
//! All rectangles live in the platform's global desktop coordinate space
//! (top-left origin, y grows downward). `scale` converts device-independent
//! widths into surface pixels for the monitor in question.

use serde::{Deserialize, Serialize};

/// Point in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle. `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(pub u32);

/// One attached display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub id: MonitorId,
    pub bounds: Rect,
    /// Surface pixels per device-independent pixel.
    pub scale: f64,
}

/// Snapshot of all attached displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayLayout {
    monitors: Vec<MonitorInfo>,
    desktop: Rect,
}

impl DisplayLayout {
    /// Builds a layout, dropping empty monitors and sanitising scales.
    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        let monitors: Vec<MonitorInfo> = monitors
            .into_iter()
            .filter(|m| !m.bounds.is_empty())
            .map(|mut m| {
                if !(m.scale.is_finite() && m.scale > 0.0) {
                    m.scale = 1.0;
                }
                m
            })
            .collect();
        let desktop = monitors
            .iter()
            .map(|m| m.bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Self { monitors, desktop }
    }

    pub fn monitors(&self) -> &[MonitorInfo] {
        &self.monitors
    }

    /// Union of all monitor bounds.
    pub fn desktop_bounds(&self) -> Rect {
        self.desktop
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Monitor that owns `p`, if any. Gaps between monitors belong to none.
    pub fn monitor_at(&self, p: Point) -> Option<&MonitorInfo> {
        self.monitors.iter().find(|m| m.bounds.contains(p))
    }
}
