//! Pointer position and display layout from CoreGraphics.
//!
//! Both use CG global coordinates in points, so the layout scale is 1.0 and
//! AppKit applies the backing scale when drawing.

use core_graphics::display::CGDisplay;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use crate::error::CoreError;
use crate::handlers::DisplaySource;
use crate::input::CursorSource;
use crate::model::{MonitorId, MonitorInfo, Point, Rect};

/// Reads the pointer from a synthetic CGEvent. Safe off the main thread.
pub struct MacCursor;

impl CursorSource for MacCursor {
    fn pointer_position(&self) -> Result<Option<Point>, CoreError> {
        let Ok(source) = CGEventSource::new(CGEventSourceStateID::CombinedSessionState) else {
            return Ok(None);
        };
        let Ok(event) = CGEvent::new(source) else {
            return Ok(None);
        };
        let p = event.location();
        Ok(Some(Point::new(p.x, p.y)))
    }
}

pub struct MacDisplays;

impl DisplaySource for MacDisplays {
    fn displays(&self) -> Result<Vec<MonitorInfo>, CoreError> {
        let ids = CGDisplay::active_displays().map_err(|code| {
            CoreError::DisplayReconfiguration(format!("CGGetActiveDisplayList failed: {}", code))
        })?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let b = CGDisplay::new(id).bounds();
                MonitorInfo {
                    id: MonitorId(id),
                    bounds: Rect::new(b.origin.x, b.origin.y, b.size.width, b.size.height),
                    scale: 1.0,
                }
            })
            .collect())
    }
}
