//! Error taxonomy for the overlay engine.
//!
//! Conditions fall in three groups:
//! - transient ([`CoreError::DisplayReconfiguration`]): absorbed by the
//!   dispatcher, logged at debug level, never shown to the user
//! - fatal to the feature ([`CoreError::PermissionDenied`],
//!   [`CoreError::RenderSurfaceUnavailable`]): reported once, after which
//!   the engine sits Hidden and stops sampling until restarted
//! - recoverable configuration problems ([`CoreError::BindingConflict`],
//!   [`CoreError::InvalidBinding`]): the previous binding stays active

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The OS refused global pointer or keyboard observation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The requested hotkey combination is already claimed.
    #[error("hotkey {binding} is already registered by another application")]
    BindingConflict { binding: String },

    /// The hotkey text could not be parsed into a usable combination.
    #[error("invalid hotkey {binding:?}: {reason}")]
    InvalidBinding { binding: String, reason: String },

    /// Monitors were added, removed or resized while querying them.
    #[error("display configuration changed: {0}")]
    DisplayReconfiguration(String),

    /// The compositor refused a topmost transparent surface.
    #[error("overlay surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Conditions the dispatcher absorbs without telling the user.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::DisplayReconfiguration(_))
    }

    /// Conditions that disable the crosshair until an explicit restart.
    pub fn is_fatal_to_feature(&self) -> bool {
        self.fault().is_some()
    }

    /// The event-bus representation of a feature-fatal error.
    pub fn fault(&self) -> Option<FeatureFault> {
        match self {
            CoreError::PermissionDenied(msg) => Some(FeatureFault::PermissionDenied(msg.clone())),
            CoreError::RenderSurfaceUnavailable(msg) => {
                Some(FeatureFault::RenderSurfaceUnavailable(msg.clone()))
            }
            _ => None,
        }
    }
}

/// Cloneable, comparable form of a feature-fatal error.
///
/// `CoreError` wraps `io::Error` and cannot be cloned, so the sampling thread
/// and platform callbacks publish this instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureFault {
    PermissionDenied(String),
    RenderSurfaceUnavailable(String),
}

impl FeatureFault {
    /// Short message suitable for a tray notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeatureFault::PermissionDenied(_) => {
                "MouseCross cannot observe the mouse pointer. Grant the permission and restart."
            }
            FeatureFault::RenderSurfaceUnavailable(_) => {
                "MouseCross cannot create its overlay window. The crosshair is disabled."
            }
        }
    }
}

impl std::fmt::Display for FeatureFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureFault::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            FeatureFault::RenderSurfaceUnavailable(msg) => {
                write!(f, "overlay surface unavailable: {}", msg)
            }
        }
    }
}

impl From<FeatureFault> for CoreError {
    fn from(fault: FeatureFault) -> Self {
        match fault {
            FeatureFault::PermissionDenied(msg) => CoreError::PermissionDenied(msg),
            FeatureFault::RenderSurfaceUnavailable(msg) => CoreError::RenderSurfaceUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reconfiguration_is_transient() {
        let err = CoreError::DisplayReconfiguration("monitor removed".into());
        assert!(err.is_transient());
        assert!(!err.is_fatal_to_feature());
    }

    #[test]
    fn test_permission_and_surface_are_fatal() {
        assert!(CoreError::PermissionDenied("x".into()).is_fatal_to_feature());
        assert!(CoreError::RenderSurfaceUnavailable("x".into()).is_fatal_to_feature());
    }

    #[test]
    fn test_binding_conflict_is_neither() {
        let err = CoreError::BindingConflict {
            binding: "Ctrl+Alt+C".into(),
        };
        assert!(!err.is_transient());
        assert!(err.fault().is_none());
        assert!(err.to_string().contains("Ctrl+Alt+C"));
    }

    #[test]
    fn test_fault_round_trips_into_core_error() {
        let fault = FeatureFault::PermissionDenied("accessibility".into());
        let err: CoreError = fault.clone().into();
        assert_eq!(err.fault(), Some(fault));
    }
}
