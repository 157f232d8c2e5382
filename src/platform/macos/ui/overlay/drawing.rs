//! NSBezierPath rendering of a crosshair geometry.
//!
//! Called from `drawRect:` of a flipped view, so geometry coordinates only
//! need translating by the screen's global origin.

use crate::geometry::{CrosshairGeometry, Marker, Paint, Primitive, Segment};
use crate::model::{Point, ShapeKind};
use crate::platform::macos::ffi::bridge::{class, id, msg_send, NSPoint, NSRect, NSSize};

// NSLineCapStyle
const BUTT_CAP: usize = 0;
const ROUND_CAP: usize = 1;

/// # Safety
/// Main thread, inside a valid drawing context.
pub unsafe fn draw_geometry(geometry: &CrosshairGeometry, origin: Point) {
    for primitive in geometry.primitives() {
        match primitive {
            Primitive::Line(segment) => draw_segment(segment, origin),
            Primitive::Shape(marker) => draw_marker(marker, origin),
        }
    }
}

fn local(p: Point, origin: Point) -> NSPoint {
    NSPoint::new(p.x - origin.x, p.y - origin.y)
}

unsafe fn set_color(paint: Paint) {
    let (r, g, b) = paint.color.to_f64();
    let color: id = msg_send![
        class!(NSColor),
        colorWithCalibratedRed: r,
        green: g,
        blue: b,
        alpha: paint.opacity
    ];
    let _: () = msg_send![color, set];
}

unsafe fn stroke_line(from: NSPoint, to: NSPoint, width: f64, cap: usize) {
    let path: id = msg_send![class!(NSBezierPath), bezierPath];
    let _: () = msg_send![path, moveToPoint: from];
    let _: () = msg_send![path, lineToPoint: to];
    let _: () = msg_send![path, setLineWidth: width];
    let _: () = msg_send![path, setLineCapStyle: cap];
    let _: () = msg_send![path, stroke];
}

unsafe fn draw_segment(segment: &Segment, origin: Point) {
    set_color(segment.paint);
    stroke_line(
        local(segment.from, origin),
        local(segment.to, origin),
        segment.width,
        BUTT_CAP,
    );
}

unsafe fn draw_marker(marker: &Marker, origin: Point) {
    set_color(marker.paint);
    match marker.kind {
        ShapeKind::Circle => {
            let c = local(marker.center, origin);
            let h = marker.half_size;
            let rect = NSRect::new(NSPoint::new(c.x - h, c.y - h), NSSize::new(h * 2.0, h * 2.0));
            let oval: id = msg_send![class!(NSBezierPath), bezierPathWithOvalInRect: rect];
            let _: () = msg_send![oval, fill];
        }
        ShapeKind::Cross => {
            for (from, to) in marker.cross_strokes() {
                stroke_line(
                    local(from, origin),
                    local(to, origin),
                    marker.stroke_width,
                    ROUND_CAP,
                );
            }
        }
        ShapeKind::ArrowToCenter | ShapeKind::Diamond => {
            let points = marker.polygon();
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            let path: id = msg_send![class!(NSBezierPath), bezierPath];
            let _: () = msg_send![path, moveToPoint: local(*first, origin)];
            for p in rest {
                let _: () = msg_send![path, lineToPoint: local(*p, origin)];
            }
            let _: () = msg_send![path, closePath];
            let _: () = msg_send![path, fill];
        }
    }
}
