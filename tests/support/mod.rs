//! In-memory platform parts for driving the engine in tests.
//!
//! Every fake writes to one shared [`Log`] so a test can assert on the
//! order and count of side effects.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use mousecross::error::CoreError;
use mousecross::geometry::CrosshairGeometry;
use mousecross::handlers::{DisplaySource, Engine, PlatformParts};
use mousecross::input::{CursorSource, HotkeyRegistrar, KeyBinding, UnavailableRegistrar};
use mousecross::model::{MonitorId, MonitorInfo, Point, Rect, Settings};
use mousecross::ui::{OverlaySurface, TrayIcon, TrayPresenter, UnavailableSurface};
use mousecross::{AppEvent, EventBus};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Show,
    Hide,
    Render(CrosshairGeometry),
    Resize(Rect),
}

#[derive(Debug, Default)]
pub struct Log {
    pub surface: Vec<SurfaceCall>,
    pub labels: Vec<String>,
    pub icons: Vec<TrayIcon>,
    pub tooltips: Vec<String>,
    pub notifications: Vec<(String, String)>,
    pub registered: Vec<String>,
    pub unregistered: Vec<String>,
}

impl Log {
    pub fn count(&self, call: fn(&SurfaceCall) -> bool) -> usize {
        self.surface.iter().filter(|c| call(c)).count()
    }

    pub fn shows(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Show))
    }

    pub fn hides(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Hide))
    }

    pub fn renders(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Render(_)))
    }

    pub fn last_render(&self) -> Option<&CrosshairGeometry> {
        self.surface.iter().rev().find_map(|c| match c {
            SurfaceCall::Render(g) => Some(g),
            _ => None,
        })
    }

    pub fn last_resize(&self) -> Option<Rect> {
        self.surface.iter().rev().find_map(|c| match c {
            SurfaceCall::Resize(r) => Some(*r),
            _ => None,
        })
    }
}

pub type SharedLog = Arc<Mutex<Log>>;

pub struct FakeSurface {
    pub log: SharedLog,
    pub fail_show: bool,
}

impl OverlaySurface for FakeSurface {
    fn show(&mut self) -> Result<(), CoreError> {
        if self.fail_show {
            return Err(CoreError::RenderSurfaceUnavailable("compositor refused".into()));
        }
        self.log.lock().unwrap().surface.push(SurfaceCall::Show);
        Ok(())
    }

    fn hide(&mut self) -> Result<(), CoreError> {
        self.log.lock().unwrap().surface.push(SurfaceCall::Hide);
        Ok(())
    }

    fn render(&mut self, geometry: &CrosshairGeometry) -> Result<(), CoreError> {
        self.log
            .lock()
            .unwrap()
            .surface
            .push(SurfaceCall::Render(geometry.clone()));
        Ok(())
    }

    fn resize_to_desktop(&mut self, bounds: Rect) -> Result<(), CoreError> {
        self.log.lock().unwrap().surface.push(SurfaceCall::Resize(bounds));
        Ok(())
    }
}

pub struct FakeTray {
    pub log: SharedLog,
}

impl TrayPresenter for FakeTray {
    fn set_toggle_label(&mut self, label: &str) {
        self.log.lock().unwrap().labels.push(label.to_string());
    }

    fn set_icon(&mut self, icon: &TrayIcon) {
        self.log.lock().unwrap().icons.push(icon.clone());
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.log.lock().unwrap().tooltips.push(tooltip.to_string());
    }

    fn notify(&mut self, title: &str, message: &str) {
        self.log
            .lock()
            .unwrap()
            .notifications
            .push((title.to_string(), message.to_string()));
    }
}

/// Refuses any binding whose normalised text is in `taken`.
pub struct FakeRegistrar {
    pub log: SharedLog,
    pub taken: HashSet<String>,
}

impl HotkeyRegistrar for FakeRegistrar {
    fn register(&mut self, binding: &KeyBinding) -> Result<(), CoreError> {
        if self.taken.contains(binding.as_str()) {
            return Err(CoreError::BindingConflict {
                binding: binding.to_string(),
            });
        }
        self.log.lock().unwrap().registered.push(binding.to_string());
        Ok(())
    }

    fn unregister(&mut self, binding: &KeyBinding) {
        self.log.lock().unwrap().unregistered.push(binding.to_string());
    }
}

pub struct FakeCursor {
    pub position: Mutex<Option<Point>>,
    pub deny: bool,
}

impl FakeCursor {
    pub fn move_to(&self, x: f64, y: f64) {
        *self.position.lock().unwrap() = Some(Point::new(x, y));
    }
}

impl CursorSource for FakeCursor {
    fn ensure_access(&self) -> Result<(), CoreError> {
        if self.deny {
            return Err(CoreError::PermissionDenied("input monitoring not granted".into()));
        }
        Ok(())
    }

    fn pointer_position(&self) -> Result<Option<Point>, CoreError> {
        Ok(*self.position.lock().unwrap())
    }
}

pub struct FakeDisplays {
    pub monitors: Arc<Mutex<Vec<MonitorInfo>>>,
}

impl DisplaySource for FakeDisplays {
    fn displays(&self) -> Result<Vec<MonitorInfo>, CoreError> {
        Ok(self.monitors.lock().unwrap().clone())
    }
}

pub fn monitor(id: u32, x: f64, y: f64, width: f64, height: f64, scale: f64) -> MonitorInfo {
    MonitorInfo {
        id: MonitorId(id),
        bounds: Rect::new(x, y, width, height),
        scale,
    }
}

/// Knobs for [`Harness::build`].
pub struct Options {
    pub settings: Settings,
    pub fail_show: bool,
    pub deny_pointer: bool,
    pub taken: Vec<&'static str>,
    pub monitors: Vec<MonitorInfo>,
    /// Startup error of the OS hotkey service, if it failed to start.
    pub hotkeys_unavailable: Option<&'static str>,
    /// Startup error of the overlay window, if it could not be created.
    pub surface_unavailable: Option<&'static str>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            fail_show: false,
            deny_pointer: false,
            taken: Vec::new(),
            monitors: vec![monitor(0, 0.0, 0.0, 1920.0, 1080.0, 1.0)],
            hotkeys_unavailable: None,
            surface_unavailable: None,
        }
    }
}

pub struct Harness {
    pub engine: Engine,
    pub log: SharedLog,
    pub cursor: Arc<FakeCursor>,
    pub monitors: Arc<Mutex<Vec<MonitorInfo>>>,
}

impl Harness {
    /// Built and started, pointer at (500, 500).
    pub fn new() -> Self {
        Self::build(Options::default())
    }

    pub fn build(options: Options) -> Self {
        let log = SharedLog::default();
        let cursor = Arc::new(FakeCursor {
            position: Mutex::new(Some(Point::new(500.0, 500.0))),
            deny: options.deny_pointer,
        });
        let monitors = Arc::new(Mutex::new(options.monitors));
        let bus = EventBus::new();

        // Mirrors the platform entry points: failed parts become inert
        // stand-ins and the fault is queued for the first pump.
        let surface: Box<dyn OverlaySurface> = match options.surface_unavailable {
            Some(reason) => {
                let fallback =
                    UnavailableSurface::from_error(&CoreError::RenderSurfaceUnavailable(reason.into()));
                bus.publisher().publish(AppEvent::FeatureFailed(fallback.fault()));
                Box::new(fallback)
            }
            None => Box::new(FakeSurface {
                log: log.clone(),
                fail_show: options.fail_show,
            }),
        };
        let hotkeys: Box<dyn HotkeyRegistrar> = match options.hotkeys_unavailable {
            Some(reason) => {
                let fallback =
                    UnavailableRegistrar::from_error(&CoreError::PermissionDenied(reason.into()));
                bus.publisher().publish(AppEvent::FeatureFailed(fallback.fault()));
                Box::new(fallback)
            }
            None => Box::new(FakeRegistrar {
                log: log.clone(),
                taken: options.taken.iter().map(|s| s.to_string()).collect(),
            }),
        };
        let parts = PlatformParts {
            surface,
            tray: Box::new(FakeTray { log: log.clone() }),
            hotkeys,
            cursor: cursor.clone(),
            displays: Box::new(FakeDisplays {
                monitors: monitors.clone(),
            }),
        };
        let mut engine = Engine::new(bus, parts, options.settings);
        engine.start();
        Self {
            engine,
            log,
            cursor,
            monitors,
        }
    }

    pub fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap()
    }
}
