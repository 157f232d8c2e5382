//! Overlay surface capability.
//!
//! Each platform implements [`OverlaySurface`] with a transparent,
//! click-through, topmost window spanning the virtual desktop.
//! [`SurfaceDriver`] wraps it to guarantee the contract: `show`/`hide` are
//! idempotent and `render` is a no-op while hidden.

use tracing::trace;

use crate::error::{CoreError, FeatureFault};
use crate::geometry::CrosshairGeometry;
use crate::model::Rect;

/// Platform drawing surface.
pub trait OverlaySurface {
    fn show(&mut self) -> Result<(), CoreError>;
    fn hide(&mut self) -> Result<(), CoreError>;
    /// Paint `geometry` (desktop coordinates), replacing the previous frame.
    fn render(&mut self, geometry: &CrosshairGeometry) -> Result<(), CoreError>;
    /// Move and resize the surface to cover `bounds`.
    fn resize_to_desktop(&mut self, bounds: Rect) -> Result<(), CoreError>;
}

pub struct SurfaceDriver {
    surface: Box<dyn OverlaySurface>,
    shown: bool,
    bounds: Option<Rect>,
}

impl SurfaceDriver {
    pub fn new(surface: Box<dyn OverlaySurface>) -> Self {
        Self {
            surface,
            shown: false,
            bounds: None,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn show(&mut self) -> Result<(), CoreError> {
        if self.shown {
            return Ok(());
        }
        self.surface.show()?;
        self.shown = true;
        Ok(())
    }

    pub fn hide(&mut self) -> Result<(), CoreError> {
        if !self.shown {
            return Ok(());
        }
        // Marked hidden even if the platform call fails so render stops.
        self.shown = false;
        self.surface.hide()
    }

    pub fn render(&mut self, geometry: &CrosshairGeometry) -> Result<(), CoreError> {
        if !self.shown {
            trace!("render skipped: surface hidden");
            return Ok(());
        }
        self.surface.render(geometry)
    }

    /// Resizes only when `bounds` differs from the current span.
    pub fn resize_to_desktop(&mut self, bounds: Rect) -> Result<(), CoreError> {
        if bounds.is_empty() || self.bounds == Some(bounds) {
            return Ok(());
        }
        self.surface.resize_to_desktop(bounds)?;
        self.bounds = Some(bounds);
        Ok(())
    }
}

/// Stands in for an overlay window the compositor refused.
///
/// Everything but `hide` fails with the startup error, so the first resize
/// or show disables the feature instead of the process exiting.
pub struct UnavailableSurface {
    reason: String,
}

impl UnavailableSurface {
    pub fn from_error(err: &CoreError) -> Self {
        let reason = match err {
            CoreError::RenderSurfaceUnavailable(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self { reason }
    }

    pub fn fault(&self) -> FeatureFault {
        FeatureFault::RenderSurfaceUnavailable(self.reason.clone())
    }

    fn error(&self) -> CoreError {
        CoreError::RenderSurfaceUnavailable(self.reason.clone())
    }
}

impl OverlaySurface for UnavailableSurface {
    fn show(&mut self) -> Result<(), CoreError> {
        Err(self.error())
    }

    fn hide(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    fn render(&mut self, _geometry: &CrosshairGeometry) -> Result<(), CoreError> {
        Err(self.error())
    }

    fn resize_to_desktop(&mut self, _bounds: Rect) -> Result<(), CoreError> {
        Err(self.error())
    }
}
