//! Tray icon controller.
//!
//! Platform-independent part of the tray: which label and icon to show for a
//! visibility state, which gesture toggles, and the menu layout. The
//! platform owns the actual icon through a [`TrayPresenter`].

pub mod icon;

use tracing::debug;

use crate::app::VisibilityState;
use crate::error::FeatureFault;
use crate::events::{TrayAction, TrayGesture};
use crate::model::constants::*;
use crate::model::{BehaviorConfig, Rgb, TrayActivation};

pub use icon::{render_icon, TrayIcon};

/// Platform tray icon.
pub trait TrayPresenter {
    fn set_toggle_label(&mut self, label: &str);
    fn set_icon(&mut self, icon: &TrayIcon);
    fn set_tooltip(&mut self, tooltip: &str);
    /// Short balloon/notification.
    fn notify(&mut self, title: &str, message: &str);
}

/// One row of the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item { action: TrayAction, label: String },
    Separator,
}

/// Label of the Toggle menu entry for `state`.
pub fn toggle_label(state: VisibilityState) -> &'static str {
    match state {
        VisibilityState::Hidden => TRAY_LABEL_SHOW,
        VisibilityState::Visible => TRAY_LABEL_HIDE,
    }
}

/// Menu layout: Toggle, separator, Settings, About, separator, Quit.
pub fn menu_entries(state: VisibilityState) -> Vec<MenuEntry> {
    let item = |action, label: &str| MenuEntry::Item {
        action,
        label: label.to_string(),
    };
    vec![
        item(TrayAction::Toggle, toggle_label(state)),
        MenuEntry::Separator,
        item(TrayAction::Settings, "Settings..."),
        item(TrayAction::About, "About"),
        MenuEntry::Separator,
        item(TrayAction::Quit, "Quit"),
    ]
}

/// Left-button edge on the tray icon, as the shell reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayButton {
    Up,
    DoubleClick,
}

/// Folds tray button edges into gestures.
///
/// A double-click arrives as up, double-click, up. The trailing up is
/// swallowed so it is not read as a second single click.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickFilter {
    after_double: bool,
}

impl ClickFilter {
    pub fn gesture(&mut self, edge: TrayButton) -> Option<TrayGesture> {
        match edge {
            TrayButton::DoubleClick => {
                self.after_double = true;
                Some(TrayGesture::DoubleClick)
            }
            TrayButton::Up if self.after_double => {
                self.after_double = false;
                None
            }
            TrayButton::Up => Some(TrayGesture::Click),
        }
    }
}

pub struct TrayController {
    presenter: Box<dyn TrayPresenter>,
    activation: TrayActivation,
    notifications: bool,
    color: Rgb,
    /// State currently reflected by the label and icon.
    shown: Option<VisibilityState>,
}

impl TrayController {
    pub fn new(presenter: Box<dyn TrayPresenter>, behavior: &BehaviorConfig, color: Rgb) -> Self {
        Self {
            presenter,
            activation: behavior.tray_activation,
            notifications: behavior.show_notifications,
            color,
            shown: None,
        }
    }

    /// Set the tooltip and reflect `state` without a notification.
    pub fn initialize(&mut self, state: VisibilityState) {
        self.presenter.set_tooltip(TRAY_TOOLTIP);
        self.refresh(state);
    }

    /// Update label and icon for `state`. Returns false if already shown.
    pub fn refresh(&mut self, state: VisibilityState) -> bool {
        if self.shown == Some(state) {
            return false;
        }
        self.presenter.set_toggle_label(toggle_label(state));
        self.presenter.set_icon(&render_icon(state, self.color));
        self.shown = Some(state);
        debug!(?state, "tray refreshed");
        true
    }

    /// Refresh and, if enabled, notify the user of the change.
    pub fn announce(&mut self, state: VisibilityState) {
        if self.refresh(state) && self.notifications {
            let message = match state {
                VisibilityState::Visible => TRAY_NOTIFY_ACTIVATED,
                VisibilityState::Hidden => TRAY_NOTIFY_DEACTIVATED,
            };
            self.presenter.notify(TRAY_NOTIFY_TITLE, message);
        }
    }

    /// Whether `gesture` on the icon toggles visibility.
    pub fn gesture_toggles(&self, gesture: TrayGesture) -> bool {
        matches!(
            (self.activation, gesture),
            (TrayActivation::SingleClick, TrayGesture::Click)
                | (TrayActivation::DoubleClick, TrayGesture::DoubleClick)
        )
    }

    pub fn apply_behavior(&mut self, behavior: &BehaviorConfig) {
        self.activation = behavior.tray_activation;
        self.notifications = behavior.show_notifications;
    }

    /// Redraw the icon if the crosshair colour changed.
    pub fn set_color(&mut self, color: Rgb) {
        if self.color == color {
            return;
        }
        self.color = color;
        if let Some(state) = self.shown {
            self.presenter.set_icon(&render_icon(state, color));
        }
    }

    /// Always shown, regardless of the notification setting.
    pub fn report_fault(&mut self, fault: &FeatureFault) {
        self.presenter.notify(TRAY_NOTIFY_TITLE, fault.user_message());
    }

    pub fn report_binding_problem(&mut self, binding: &str) {
        self.presenter.notify(
            TRAY_NOTIFY_TITLE,
            &format!("The hotkey {} is not available. The previous hotkey is still active.", binding),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_label_per_state() {
        assert_eq!(toggle_label(VisibilityState::Hidden), "Show Crosshair");
        assert_eq!(toggle_label(VisibilityState::Visible), "Hide Crosshair");
    }

    #[test]
    fn test_menu_layout() {
        let entries = menu_entries(VisibilityState::Visible);
        assert_eq!(entries.len(), 6);
        assert_eq!(
            entries[0],
            MenuEntry::Item {
                action: TrayAction::Toggle,
                label: "Hide Crosshair".into()
            }
        );
        assert_eq!(entries[1], MenuEntry::Separator);
        assert!(matches!(entries[5], MenuEntry::Item { action: TrayAction::Quit, .. }));
    }
}
