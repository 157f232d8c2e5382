//! Coordinating dispatcher.
//!
//! [`Engine`] owns every component and is the only code that touches
//! visibility, appearance or the overlay surface. The platform run loop
//! calls [`Engine::pump`] whenever the bus wakes it (and on a heartbeat
//! timer), then executes the returned [`HostRequest`]s outside the engine
//! so modal dialogs never re-enter it.
//!
//! # Architecture
//!
//! ```text
//! EventBus::drain() → Engine::dispatch() → visibility / tracker / surface / tray
//!                                        ↘ Vec<HostRequest> → platform
//! ```
//!
//! Within one batch, events are applied in order. Visibility side effects
//! are committed once at the end of the batch, then the newest pointer
//! sample (if any) is rendered.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::app::{VisibilityController, VisibilityHandle, VisibilityState};
use crate::error::{CoreError, FeatureFault};
use crate::events::{AppEvent, EventBus, EventPublisher, ToggleSource, TrayAction};
use crate::geometry::{self, CursorSample};
use crate::input::{CursorSource, CursorTracker, GlobalHotkeyListener, HotkeyRegistrar, KeyBinding};
use crate::model::{DisplayLayout, MonitorInfo, Settings};
use crate::ui::{OverlaySurface, SurfaceDriver, TrayController, TrayPresenter};

/// Enumerates attached monitors.
pub trait DisplaySource {
    fn displays(&self) -> Result<Vec<MonitorInfo>, CoreError>;
}

/// Work the platform layer performs after `pump` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    OpenSettings,
    ShowAbout,
    Quit,
}

/// Notifications for dialogs that mirror the crosshair status.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Visibility(VisibilityState),
    BindingConflict { binding: String },
    InvalidBinding { binding: String, reason: String },
    FeatureDisabled(FeatureFault),
}

type StatusListener = Box<dyn FnMut(&StatusEvent)>;

/// Platform implementations handed to the engine.
pub struct PlatformParts {
    pub surface: Box<dyn OverlaySurface>,
    pub tray: Box<dyn TrayPresenter>,
    pub hotkeys: Box<dyn HotkeyRegistrar>,
    pub cursor: Arc<dyn CursorSource>,
    pub displays: Box<dyn DisplaySource>,
}

pub struct Engine {
    bus: EventBus,
    settings: Settings,
    visibility: VisibilityController,
    surface: SurfaceDriver,
    tray: TrayController,
    hotkeys: GlobalHotkeyListener,
    tracker: CursorTracker,
    displays: Box<dyn DisplaySource>,
    layout: DisplayLayout,
    last_sample: Option<CursorSample>,
    fault: Option<FeatureFault>,
    listeners: Vec<StatusListener>,
    started: bool,
}

impl Engine {
    /// Build an engine. Nothing touches the OS until [`start`](Self::start).
    pub fn new(bus: EventBus, parts: PlatformParts, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let initial = VisibilityState::initial(settings.behavior.activate_on_start);
        Self {
            bus,
            visibility: VisibilityController::new(initial),
            surface: SurfaceDriver::new(parts.surface),
            tray: TrayController::new(parts.tray, &settings.behavior, settings.appearance.color),
            hotkeys: GlobalHotkeyListener::new(parts.hotkeys),
            tracker: CursorTracker::new(
                parts.cursor,
                DisplayLayout::default(),
                settings.behavior.sample_interval(),
            ),
            displays: parts.displays,
            layout: DisplayLayout::default(),
            last_sample: None,
            fault: None,
            listeners: Vec::new(),
            settings,
            started: false,
        }
    }

    /// Query displays, register the hotkey, set up the tray and apply the
    /// initial visibility.
    ///
    /// Feature-fatal problems do not fail startup; they leave the engine
    /// disabled (see [`disabled_reason`](Self::disabled_reason)).
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            initial = ?self.visibility.current(),
            hotkey = %self.settings.behavior.toggle_hotkey,
            "starting crosshair engine"
        );

        self.refresh_displays();
        let initial = self.visibility.current();
        self.tray.initialize(initial);
        let hotkey = self.settings.behavior.toggle_hotkey.clone();
        self.rebind(&hotkey);
        // A startup fault has already forced Hidden
        if self.fault.is_none() && initial.is_visible() {
            self.apply_visibility(initial, false);
        }
    }

    pub fn publisher(&self) -> EventPublisher {
        self.bus.publisher()
    }

    pub fn visibility_handle(&self) -> VisibilityHandle {
        self.visibility.handle()
    }

    pub fn current_visibility(&self) -> VisibilityState {
        self.visibility.current()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_binding(&self) -> Option<&KeyBinding> {
        self.hotkeys.active()
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }

    pub fn is_sampling(&self) -> bool {
        self.tracker.is_running()
    }

    pub fn disabled_reason(&self) -> Option<&FeatureFault> {
        self.fault.as_ref()
    }

    /// Register a status listener (dialogs keep their status display in sync).
    pub fn subscribe(&mut self, listener: impl FnMut(&StatusEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Toggle from code on the loop thread; side effects apply immediately.
    pub fn toggle_visibility(&mut self) -> VisibilityState {
        self.request_toggle(ToggleSource::Api);
        self.commit_visibility();
        self.visibility.current()
    }

    /// Drain the bus and dispatch everything in it.
    pub fn pump(&mut self) -> Vec<HostRequest> {
        let events = self.bus.drain();
        if events.is_empty() {
            return Vec::new();
        }
        self.dispatch(events)
    }

    /// Apply one batch of events.
    pub fn dispatch(&mut self, events: Vec<AppEvent>) -> Vec<HostRequest> {
        let mut requests = Vec::new();
        let mut newest: Option<CursorSample> = None;
        let mut displays_dirty = false;

        for event in events {
            match event {
                AppEvent::ToggleVisibility(source) => self.request_toggle(source),
                AppEvent::Hotkey { id, state, at } => {
                    if self.hotkeys.accept(id, state, at) {
                        self.request_toggle(ToggleSource::Hotkey);
                    }
                }
                AppEvent::Tray(gesture) => {
                    if self.tray.gesture_toggles(gesture) {
                        self.request_toggle(ToggleSource::TrayClick);
                    }
                }
                AppEvent::TrayMenu(TrayAction::Toggle) => self.request_toggle(ToggleSource::TrayMenu),
                AppEvent::TrayMenu(TrayAction::Settings) => push_once(&mut requests, HostRequest::OpenSettings),
                AppEvent::TrayMenu(TrayAction::About) => push_once(&mut requests, HostRequest::ShowAbout),
                AppEvent::TrayMenu(TrayAction::Quit) | AppEvent::Quit => {
                    push_once(&mut requests, HostRequest::Quit)
                }
                AppEvent::CursorMoved { session, sample } => {
                    if self.tracker.accepts(session) {
                        newest = Some(sample);
                    }
                }
                AppEvent::CursorLost { session } => {
                    if self.tracker.accepts(session) {
                        // Hold the last sample; the layout may be stale.
                        newest = None;
                        displays_dirty = true;
                    }
                }
                AppEvent::DisplaysChanged => displays_dirty = true,
                AppEvent::SettingsChanged(settings) => self.apply_settings(*settings),
                AppEvent::FeatureFailed(fault) => self.disable(fault),
            }
        }

        if displays_dirty {
            self.refresh_displays();
        }
        self.commit_visibility();
        if let Some(sample) = newest {
            self.last_sample = Some(sample);
            self.render_current();
        }
        requests
    }

    /// Replace the settings snapshot.
    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        if settings == self.settings {
            return;
        }
        let old = std::mem::replace(&mut self.settings, settings);
        info!("settings updated");

        if old.behavior.toggle_hotkey != self.settings.behavior.toggle_hotkey {
            let hotkey = self.settings.behavior.toggle_hotkey.clone();
            self.rebind(&hotkey);
        }
        if old.behavior.sample_interval_ms != self.settings.behavior.sample_interval_ms {
            self.tracker.set_interval(self.settings.behavior.sample_interval());
        }
        self.tray.apply_behavior(&self.settings.behavior);
        self.tray.set_color(self.settings.appearance.color);
        if old.appearance != self.settings.appearance {
            self.render_current();
        }
    }

    /// Clear a feature fault. The crosshair stays Hidden until toggled.
    pub fn restart_feature(&mut self) {
        if let Some(fault) = self.fault.take() {
            info!(%fault, "crosshair feature re-enabled");
            self.refresh_displays();
        }
    }

    /// Stop sampling, release the hotkey and hide the surface.
    pub fn shutdown(&mut self) {
        self.tracker.stop();
        self.hotkeys.unbind();
        if let Err(e) = self.surface.hide() {
            debug!(error = %e, "hide during shutdown failed");
        }
        info!("crosshair engine stopped");
    }

    // === Internals ===

    fn request_toggle(&mut self, source: ToggleSource) {
        if let Some(fault) = &self.fault {
            debug!(?source, %fault, "toggle ignored: feature disabled");
            return;
        }
        let state = self.visibility.toggle();
        debug!(?source, ?state, "visibility toggled");
    }

    fn commit_visibility(&mut self) {
        if let Some(state) = self.visibility.take_change() {
            self.apply_visibility(state, true);
        }
    }

    fn apply_visibility(&mut self, state: VisibilityState, announce: bool) {
        match state {
            VisibilityState::Visible => {
                if let Err(e) = self.surface.show() {
                    self.fail(e);
                    return;
                }
                if let Err(e) = self.tracker.start(self.bus.publisher()) {
                    self.fail(e);
                    return;
                }
                match self.tracker.sample_now() {
                    Ok(Some(sample)) => self.last_sample = Some(sample),
                    Ok(None) => {}
                    Err(e) => {
                        self.fail(e);
                        return;
                    }
                }
                self.render_current();
            }
            VisibilityState::Hidden => {
                self.tracker.stop();
                if let Err(e) = self.surface.hide() {
                    warn!(error = %e, "overlay hide failed");
                }
            }
        }
        if announce {
            self.tray.announce(state);
        } else {
            self.tray.refresh(state);
        }
        self.notify(&StatusEvent::Visibility(state));
    }

    fn render_current(&mut self) {
        if self.fault.is_some() || !self.visibility.committed().is_visible() {
            return;
        }
        let Some(sample) = self.last_sample else {
            return;
        };
        let geometry = geometry::build(&sample, self.layout.desktop_bounds(), &self.settings.appearance);
        if let Err(e) = self.surface.render(&geometry) {
            self.fail(e);
        }
    }

    fn refresh_displays(&mut self) {
        let monitors = match self.displays.displays() {
            Ok(monitors) if !monitors.is_empty() => monitors,
            Ok(_) => {
                debug!("display query returned no monitors; keeping previous layout");
                return;
            }
            Err(e) => {
                debug!(error = %e, "display query failed; keeping previous layout");
                return;
            }
        };
        let layout = DisplayLayout::new(monitors);
        if layout == self.layout {
            return;
        }
        let bounds = layout.desktop_bounds();
        debug!(
            monitors = layout.monitors().len(),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "display layout updated"
        );
        self.layout = layout.clone();
        self.tracker.set_layout(layout);

        // Rescale the held sample, or drop it if its monitor is gone.
        self.last_sample = self.last_sample.and_then(|mut s| {
            let m = self.layout.monitor_at(s.position())?;
            s.monitor = m.id;
            s.scale = m.scale;
            Some(s)
        });

        if let Err(e) = self.surface.resize_to_desktop(bounds) {
            self.fail(e);
            return;
        }
        self.render_current();
    }

    fn rebind(&mut self, text: &str) {
        let binding = match text.parse::<KeyBinding>() {
            Ok(b) => b,
            Err(CoreError::InvalidBinding { binding, reason }) => {
                warn!(%binding, %reason, "invalid hotkey");
                self.notify(&StatusEvent::InvalidBinding { binding, reason });
                return;
            }
            Err(e) => {
                warn!(error = %e, "invalid hotkey");
                return;
            }
        };
        match self.hotkeys.bind(binding) {
            Ok(()) => {}
            Err(CoreError::BindingConflict { binding }) => {
                self.tray.report_binding_problem(&binding);
                self.notify(&StatusEvent::BindingConflict { binding });
            }
            Err(e) => self.fail(e),
        }
    }

    /// Route an error: feature-fatal ones disable, the rest are logged.
    fn fail(&mut self, err: CoreError) {
        match err.fault() {
            Some(fault) => self.disable(fault),
            None if err.is_transient() => debug!(error = %err, "transient condition absorbed"),
            None => warn!(error = %err, "overlay operation failed"),
        }
    }

    /// Report once, then sit Hidden and stop sampling until restarted.
    fn disable(&mut self, fault: FeatureFault) {
        if self.fault.is_some() {
            return;
        }
        error!(%fault, "crosshair disabled");
        self.fault = Some(fault.clone());
        self.tracker.stop();
        self.visibility.force(VisibilityState::Hidden);
        if let Some(state) = self.visibility.take_change() {
            if let Err(e) = self.surface.hide() {
                debug!(error = %e, "hide after fault failed");
            }
            self.tray.refresh(state);
            self.notify(&StatusEvent::Visibility(state));
        } else if self.surface.is_shown() {
            // show() succeeded but a later step failed in the same commit
            let _ = self.surface.hide();
            self.tray.refresh(VisibilityState::Hidden);
        }
        self.tray.report_fault(&fault);
        self.notify(&StatusEvent::FeatureDisabled(fault));
    }

    fn notify(&mut self, event: &StatusEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.tracker.stop();
    }
}

fn push_once(requests: &mut Vec<HostRequest>, request: HostRequest) {
    if !requests.contains(&request) {
        requests.push(request);
    }
}
