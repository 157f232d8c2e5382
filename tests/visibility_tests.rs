//! Visibility state machine and the idempotent surface contract.

mod support;

use std::time::Instant;

use mousecross::app::{VisibilityController, VisibilityState};
use mousecross::geometry::{build, CursorSample};
use mousecross::model::{AppearanceConfig, MonitorId, Rect};
use mousecross::ui::SurfaceDriver;

use support::{FakeSurface, SharedLog, SurfaceCall};

fn driver() -> (SurfaceDriver, SharedLog) {
    let log = SharedLog::default();
    let surface = FakeSurface {
        log: log.clone(),
        fail_show: false,
    };
    (SurfaceDriver::new(Box::new(surface)), log)
}

fn some_geometry() -> mousecross::CrosshairGeometry {
    let sample = CursorSample {
        x: 50.0,
        y: 50.0,
        monitor: MonitorId(0),
        scale: 1.0,
        timestamp: Instant::now(),
    };
    build(&sample, Rect::new(0.0, 0.0, 100.0, 100.0), &AppearanceConfig::default())
}

#[test]
fn batch_commits_only_the_net_change() {
    let mut c = VisibilityController::new(VisibilityState::Hidden);
    for _ in 0..3 {
        c.toggle();
    }
    assert_eq!(c.take_change(), Some(VisibilityState::Visible));

    for _ in 0..4 {
        c.toggle();
    }
    assert_eq!(c.take_change(), None);
    assert_eq!(c.committed(), VisibilityState::Visible);
}

#[test]
fn force_overrides_pending_toggles() {
    let mut c = VisibilityController::new(VisibilityState::Visible);
    c.toggle();
    c.toggle();
    c.force(VisibilityState::Hidden);
    assert_eq!(c.take_change(), Some(VisibilityState::Hidden));
}

#[test]
fn handle_is_readable_from_another_thread() {
    let mut c = VisibilityController::new(VisibilityState::Hidden);
    let handle = c.handle();
    c.toggle();
    let seen = std::thread::spawn(move || handle.current()).join().unwrap();
    assert_eq!(seen, VisibilityState::Visible);
}

#[test]
fn show_twice_shows_once() {
    let (mut d, log) = driver();
    d.show().unwrap();
    d.show().unwrap();
    assert!(d.is_shown());
    assert_eq!(log.lock().unwrap().surface, vec![SurfaceCall::Show]);
}

#[test]
fn hide_when_hidden_is_noop() {
    let (mut d, log) = driver();
    d.hide().unwrap();
    d.show().unwrap();
    d.hide().unwrap();
    d.hide().unwrap();
    assert_eq!(
        log.lock().unwrap().surface,
        vec![SurfaceCall::Show, SurfaceCall::Hide]
    );
}

#[test]
fn render_is_skipped_while_hidden() {
    let (mut d, log) = driver();
    let g = some_geometry();
    d.render(&g).unwrap();
    assert!(log.lock().unwrap().surface.is_empty());

    d.show().unwrap();
    d.render(&g).unwrap();
    assert_eq!(log.lock().unwrap().renders(), 1);
}

#[test]
fn repeated_toggling_never_stacks_surfaces() {
    let (mut d, log) = driver();
    for _ in 0..50 {
        d.show().unwrap();
        d.show().unwrap();
        d.hide().unwrap();
    }
    let log = log.lock().unwrap();
    assert_eq!(log.shows(), 50);
    assert_eq!(log.hides(), 50);
    assert!(!d.is_shown());
}

#[test]
fn resize_only_when_bounds_change() {
    let (mut d, log) = driver();
    let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    d.resize_to_desktop(bounds).unwrap();
    d.resize_to_desktop(bounds).unwrap();
    d.resize_to_desktop(Rect::default()).unwrap();
    assert_eq!(d.bounds(), Some(bounds));
    assert_eq!(log.lock().unwrap().surface, vec![SurfaceCall::Resize(bounds)]);
}
