//! End-to-end dispatch tests: events in, platform side effects out.

mod support;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use mousecross::events::{KeyState, ToggleSource, TrayAction, TrayGesture};
use mousecross::geometry::{CursorSample, Direction};
use mousecross::model::{MonitorId, Rect, Rgb, TrayActivation};
use mousecross::{AppEvent, FeatureFault, HostRequest, Settings, StatusEvent, VisibilityState};

use support::{monitor, Harness, Options};

fn toggles(n: usize) -> Vec<AppEvent> {
    vec![AppEvent::TrayMenu(TrayAction::Toggle); n]
}

fn key(id: u32, state: KeyState, at: Instant) -> AppEvent {
    AppEvent::Hotkey { id, state, at }
}

fn with_hotkey(text: &str) -> Settings {
    let mut settings = Settings::default();
    settings.behavior.toggle_hotkey = text.to_string();
    settings
}

// === Startup ===

#[test]
fn starts_hidden_with_tray_and_hotkey() {
    let h = Harness::new();
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    assert_eq!(h.engine.active_binding().unwrap().as_str(), "Ctrl+Alt+C");
    assert!(!h.engine.is_sampling());

    let log = h.log();
    assert_eq!(log.labels, vec!["Show Crosshair"]);
    assert_eq!(log.tooltips.len(), 1);
    assert_eq!(log.icons.len(), 1);
    assert_eq!(log.shows(), 0);
    assert_eq!(log.last_resize(), Some(Rect::new(0.0, 0.0, 1920.0, 1080.0)));
}

#[test]
fn activate_on_start_shows_without_notification() {
    let mut settings = Settings::default();
    settings.behavior.activate_on_start = true;
    let h = Harness::build(Options {
        settings,
        ..Default::default()
    });

    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
    assert!(h.engine.is_sampling());
    let log = h.log();
    assert_eq!(log.labels, vec!["Hide Crosshair"]);
    assert_eq!(log.shows(), 1);
    assert_eq!(log.renders(), 1);
    assert!(log.notifications.is_empty());
}

// === Toggling ===

#[test]
fn three_rapid_toggles_end_visible_with_one_label_change() {
    let mut h = Harness::new();
    let requests = h.engine.dispatch(toggles(3));

    assert!(requests.is_empty());
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
    let log = h.log();
    assert_eq!(log.labels, vec!["Show Crosshair", "Hide Crosshair"]);
    assert_eq!(log.shows(), 1);
    assert_eq!(log.notifications.len(), 1);
    assert_eq!(log.notifications[0].1, "Crosshair activated");
}

#[test]
fn toggles_that_cancel_out_have_no_side_effects() {
    let mut h = Harness::new();
    h.engine.dispatch(toggles(2));

    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    let log = h.log();
    assert_eq!(log.labels.len(), 1);
    assert_eq!(log.shows(), 0);
    assert_eq!(log.hides(), 0);
}

#[test]
fn visible_renders_current_pointer() {
    let mut h = Harness::new();
    h.cursor.move_to(300.0, 200.0);
    assert_eq!(h.engine.toggle_visibility(), VisibilityState::Visible);

    let log = h.log();
    let geometry = log.last_render().expect("rendered on show");
    assert_eq!(geometry.cursor.x, 300.0);
    assert_eq!(geometry.cursor.y, 200.0);
    assert_eq!(geometry.arms.len(), 4);
}

#[test]
fn hide_stops_sampling() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    assert!(h.engine.is_sampling());

    h.engine.toggle_visibility();
    assert!(!h.engine.is_sampling());
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    let log = h.log();
    assert_eq!(log.hides(), 1);
    assert_eq!(log.labels.last().unwrap(), "Show Crosshair");
    assert_eq!(log.notifications.last().unwrap().1, "Crosshair deactivated");
}

#[test]
fn notifications_can_be_disabled() {
    let mut settings = Settings::default();
    settings.behavior.show_notifications = false;
    let mut h = Harness::build(Options {
        settings,
        ..Default::default()
    });
    h.engine.toggle_visibility();
    assert!(h.log().notifications.is_empty());
}

#[test]
fn published_toggle_applies_on_pump() {
    let mut h = Harness::new();
    let publisher = h.engine.publisher();
    assert!(publisher.publish(AppEvent::ToggleVisibility(ToggleSource::Api)));
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    h.engine.pump();
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
    assert!(h.engine.visibility_handle().current().is_visible());
}

#[test]
fn status_listener_sees_visibility_changes() {
    let mut h = Harness::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    h.engine.toggle_visibility();
    h.engine.toggle_visibility();
    assert_eq!(
        *seen.borrow(),
        vec![
            StatusEvent::Visibility(VisibilityState::Visible),
            StatusEvent::Visibility(VisibilityState::Hidden),
        ]
    );
}

// === Tray ===

#[test]
fn double_click_toggles_by_default() {
    let mut h = Harness::new();
    h.engine.dispatch(vec![AppEvent::Tray(TrayGesture::Click)]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    h.engine.dispatch(vec![AppEvent::Tray(TrayGesture::DoubleClick)]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
}

#[test]
fn single_click_activation() {
    let mut settings = Settings::default();
    settings.behavior.tray_activation = TrayActivation::SingleClick;
    let mut h = Harness::build(Options {
        settings,
        ..Default::default()
    });
    h.engine.dispatch(vec![AppEvent::Tray(TrayGesture::DoubleClick)]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    h.engine.dispatch(vec![AppEvent::Tray(TrayGesture::Click)]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
}

#[test]
fn menu_actions_become_host_requests_once_per_batch() {
    let mut h = Harness::new();
    let requests = h.engine.dispatch(vec![
        AppEvent::TrayMenu(TrayAction::Settings),
        AppEvent::TrayMenu(TrayAction::About),
        AppEvent::TrayMenu(TrayAction::Settings),
        AppEvent::TrayMenu(TrayAction::Quit),
        AppEvent::Quit,
    ]);
    assert_eq!(
        requests,
        vec![HostRequest::OpenSettings, HostRequest::ShowAbout, HostRequest::Quit]
    );
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
}

// === Hotkey ===

#[test]
fn hotkey_press_toggles_once_per_physical_press() {
    let mut h = Harness::new();
    let id = h.engine.active_binding().unwrap().id();
    let t0 = Instant::now();
    h.engine.dispatch(vec![
        key(id, KeyState::Pressed, t0),
        // auto-repeat while held
        key(id, KeyState::Pressed, t0 + Duration::from_millis(40)),
        key(id, KeyState::Released, t0 + Duration::from_millis(90)),
    ]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
}

#[test]
fn two_presses_in_one_batch_toggle_twice() {
    let mut h = Harness::new();
    let id = h.engine.active_binding().unwrap().id();
    let t0 = Instant::now();
    h.engine.dispatch(vec![
        key(id, KeyState::Pressed, t0),
        key(id, KeyState::Released, t0 + Duration::from_millis(80)),
        key(id, KeyState::Pressed, t0 + Duration::from_millis(300)),
        key(id, KeyState::Released, t0 + Duration::from_millis(380)),
    ]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    // Net change is zero, so nothing was shown
    assert_eq!(h.log().shows(), 0);
}

#[test]
fn hotkey_bounce_within_debounce_window_toggles_once() {
    let mut h = Harness::new();
    let id = h.engine.active_binding().unwrap().id();
    let t0 = Instant::now();
    h.engine.dispatch(vec![
        key(id, KeyState::Pressed, t0),
        key(id, KeyState::Released, t0 + Duration::from_millis(20)),
        key(id, KeyState::Pressed, t0 + Duration::from_millis(60)),
    ]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);
}

#[test]
fn hotkey_with_other_id_is_ignored() {
    let mut h = Harness::new();
    let id = h.engine.active_binding().unwrap().id();
    h.engine
        .dispatch(vec![key(id.wrapping_add(1), KeyState::Pressed, Instant::now())]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
}

#[test]
fn binding_conflict_at_start_keeps_hidden_and_unbound() {
    let h = Harness::build(Options {
        taken: vec!["Ctrl+Alt+C"],
        ..Default::default()
    });
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    assert!(h.engine.active_binding().is_none());
    assert!(h.engine.disabled_reason().is_none());

    let log = h.log();
    assert!(log.registered.is_empty());
    assert_eq!(log.notifications.len(), 1);
    assert!(log.notifications[0].1.contains("Ctrl+Alt+C"));
}

#[test]
fn binding_conflict_on_change_keeps_previous_binding() {
    let mut h = Harness::build(Options {
        taken: vec!["Ctrl+Shift+X"],
        ..Default::default()
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    h.engine.apply_settings(with_hotkey("shift+ctrl+x"));

    assert_eq!(h.engine.active_binding().unwrap().as_str(), "Ctrl+Alt+C");
    assert!(h.log().unregistered.is_empty());
    assert_eq!(
        *seen.borrow(),
        vec![StatusEvent::BindingConflict {
            binding: "Ctrl+Shift+X".into()
        }]
    );
}

#[test]
fn settings_change_rebinds_new_before_releasing_old() {
    let mut h = Harness::new();
    h.engine.apply_settings(with_hotkey("Alt+F2"));

    assert_eq!(h.engine.active_binding().unwrap().as_str(), "Alt+F2");
    let log = h.log();
    assert_eq!(log.registered, vec!["Ctrl+Alt+C", "Alt+F2"]);
    assert_eq!(log.unregistered, vec!["Ctrl+Alt+C"]);
}

#[test]
fn invalid_binding_is_reported_and_ignored() {
    let mut h = Harness::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    h.engine.apply_settings(with_hotkey("C"));

    assert_eq!(h.engine.active_binding().unwrap().as_str(), "Ctrl+Alt+C");
    assert!(matches!(
        seen.borrow().as_slice(),
        [StatusEvent::InvalidBinding { binding, .. }] if binding == "C"
    ));
}

// === Faults ===

#[test]
fn permission_denied_disables_and_reports_once() {
    let mut h = Harness::build(Options {
        deny_pointer: true,
        ..Default::default()
    });
    h.engine.toggle_visibility();

    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    assert!(!h.engine.is_sampling());
    assert!(matches!(
        h.engine.disabled_reason(),
        Some(FeatureFault::PermissionDenied(_))
    ));

    // Further toggles and repeated faults change nothing
    h.engine.dispatch(toggles(1));
    h.engine.dispatch(vec![AppEvent::FeatureFailed(FeatureFault::PermissionDenied(
        "again".into(),
    ))]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    let log = h.log();
    assert_eq!(log.notifications.len(), 1);
    assert!(log.notifications[0].1.contains("cannot observe"));
}

#[test]
fn surface_failure_disables_feature() {
    let mut h = Harness::build(Options {
        fail_show: true,
        ..Default::default()
    });
    h.engine.toggle_visibility();

    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    assert!(matches!(
        h.engine.disabled_reason(),
        Some(FeatureFault::RenderSurfaceUnavailable(_))
    ));
    assert_eq!(h.log().renders(), 0);
}

#[test]
fn hotkey_service_failure_disables_without_stopping() {
    let mut h = Harness::build(Options {
        hotkeys_unavailable: Some("hotkey manager could not start"),
        ..Default::default()
    });

    assert_eq!(
        h.engine.disabled_reason(),
        Some(&FeatureFault::PermissionDenied("hotkey manager could not start".into()))
    );
    assert!(h.engine.active_binding().is_none());
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    // The queued startup fault is absorbed; the loop keeps serving the tray
    assert!(h.engine.pump().is_empty());
    let requests = h.engine.dispatch(vec![
        AppEvent::TrayMenu(TrayAction::Toggle),
        AppEvent::TrayMenu(TrayAction::About),
    ]);
    assert_eq!(requests, vec![HostRequest::ShowAbout]);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    let log = h.log();
    assert_eq!(log.notifications.len(), 1);
    assert_eq!(log.shows(), 0);
}

#[test]
fn hotkey_service_failure_overrides_activate_on_start() {
    let mut settings = Settings::default();
    settings.behavior.activate_on_start = true;
    let h = Harness::build(Options {
        settings,
        hotkeys_unavailable: Some("denied"),
        ..Default::default()
    });

    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
    assert!(!h.engine.is_sampling());
    assert_eq!(h.log().shows(), 0);
}

#[test]
fn overlay_window_failure_disables_without_stopping() {
    let mut h = Harness::build(Options {
        surface_unavailable: Some("no layered windows"),
        ..Default::default()
    });

    assert_eq!(
        h.engine.disabled_reason(),
        Some(&FeatureFault::RenderSurfaceUnavailable("no layered windows".into()))
    );
    assert!(h.engine.pump().is_empty());
    h.engine.dispatch(toggles(1));
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);

    let log = h.log();
    assert_eq!(log.notifications.len(), 1);
    assert!(log.notifications[0].1.contains("overlay window"));
}

#[test]
fn restart_feature_clears_fault() {
    let mut h = Harness::build(Options {
        deny_pointer: true,
        ..Default::default()
    });
    h.engine.toggle_visibility();
    assert!(h.engine.disabled_reason().is_some());

    h.engine.restart_feature();
    assert!(h.engine.disabled_reason().is_none());
    assert_eq!(h.engine.current_visibility(), VisibilityState::Hidden);
}

// === Displays and samples ===

#[test]
fn display_change_resizes_and_rerenders() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    h.monitors
        .lock()
        .unwrap()
        .push(monitor(1, 1920.0, 0.0, 2560.0, 1440.0, 1.5));

    h.engine.dispatch(vec![AppEvent::DisplaysChanged]);

    assert_eq!(h.engine.layout().monitors().len(), 2);
    let log = h.log();
    assert_eq!(log.last_resize(), Some(Rect::new(0.0, 0.0, 4480.0, 1440.0)));
    let geometry = log.last_render().unwrap();
    assert_eq!(geometry.arm(Direction::Right).unwrap().end.x, 4480.0);
    assert_eq!(geometry.arm(Direction::Down).unwrap().end.y, 1440.0);
}

#[test]
fn empty_display_query_keeps_previous_layout() {
    let mut h = Harness::new();
    h.monitors.lock().unwrap().clear();
    h.engine.dispatch(vec![AppEvent::DisplaysChanged]);
    assert_eq!(h.engine.layout().monitors().len(), 1);
}

#[test]
fn samples_from_stale_session_are_dropped() {
    let mut h = Harness::new();
    let sample = |x: f64| CursorSample {
        x,
        y: 300.0,
        monitor: MonitorId(0),
        scale: 1.0,
        timestamp: Instant::now(),
    };

    // Hidden: nothing is sampling, so no session is accepted
    h.engine.dispatch(vec![AppEvent::CursorMoved {
        session: 1,
        sample: sample(100.0),
    }]);
    assert_eq!(h.log().renders(), 0);

    h.engine.toggle_visibility();
    let before = h.log().renders();
    h.engine.dispatch(vec![AppEvent::CursorMoved {
        session: 0,
        sample: sample(100.0),
    }]);
    assert_eq!(h.log().renders(), before);
}

fn sample_at(x: f64, y: f64, monitor: u32) -> CursorSample {
    CursorSample {
        x,
        y,
        monitor: MonitorId(monitor),
        scale: 1.0,
        timestamp: Instant::now(),
    }
}

fn recolour(h: &mut Harness) {
    let mut settings = h.engine.settings().clone();
    settings.appearance.color = Rgb::new(0, 255, 0);
    h.engine.apply_settings(settings);
}

#[test]
fn cursor_lost_holds_last_sample() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    h.engine.dispatch(vec![AppEvent::CursorMoved {
        session: 1,
        sample: sample_at(800.0, 300.0, 0),
    }]);
    let renders = h.log().renders();

    h.engine.dispatch(vec![AppEvent::CursorLost { session: 1 }]);
    assert_eq!(h.log().renders(), renders);
    assert_eq!(h.engine.current_visibility(), VisibilityState::Visible);

    // The next redraw still uses the held sample
    recolour(&mut h);
    let log = h.log();
    assert_eq!(log.renders(), renders + 1);
    let right = log.last_render().unwrap().arm(Direction::Right).unwrap();
    assert_eq!((right.start.x, right.start.y), (810.0, 300.0));
}

#[test]
fn cursor_lost_discards_sample_from_same_batch() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    let renders = h.log().renders();

    h.engine.dispatch(vec![
        AppEvent::CursorMoved {
            session: 1,
            sample: sample_at(900.0, 200.0, 0),
        },
        AppEvent::CursorLost { session: 1 },
    ]);
    assert_eq!(h.log().renders(), renders);

    recolour(&mut h);
    let log = h.log();
    let right = log.last_render().unwrap().arm(Direction::Right).unwrap();
    assert_eq!((right.start.x, right.start.y), (510.0, 500.0));
}

#[test]
fn cursor_lost_after_monitor_removal_clears_sample() {
    let mut h = Harness::build(Options {
        monitors: vec![
            monitor(0, 0.0, 0.0, 1920.0, 1080.0, 1.0),
            monitor(1, 1920.0, 0.0, 2560.0, 1440.0, 1.0),
        ],
        ..Default::default()
    });
    h.engine.toggle_visibility();
    h.engine.dispatch(vec![AppEvent::CursorMoved {
        session: 1,
        sample: sample_at(3000.0, 500.0, 1),
    }]);
    let renders = h.log().renders();

    h.monitors.lock().unwrap().truncate(1);
    h.engine.dispatch(vec![AppEvent::CursorLost { session: 1 }]);

    assert_eq!(h.engine.layout().monitors().len(), 1);
    assert_eq!(h.log().last_resize(), Some(Rect::new(0.0, 0.0, 1920.0, 1080.0)));
    assert_eq!(h.log().renders(), renders);

    // Nothing left to draw until the tracker reports a new position
    recolour(&mut h);
    assert_eq!(h.log().renders(), renders);
}

#[test]
fn appearance_change_rerenders_and_recolours_tray() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    let (renders, icons) = {
        let log = h.log();
        (log.renders(), log.icons.len())
    };

    let mut settings = Settings::default();
    settings.appearance.color = Rgb::new(0, 0, 255);
    h.engine.apply_settings(settings);

    let log = h.log();
    assert_eq!(log.renders(), renders + 1);
    assert_eq!(log.icons.len(), icons + 1);
    let geometry = log.last_render().unwrap();
    assert_eq!(geometry.arms[0].segments[0].paint.color, Rgb::new(0, 0, 255));
}

#[test]
fn identical_settings_are_ignored() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    let renders = h.log().renders();
    h.engine
        .dispatch(vec![AppEvent::SettingsChanged(Box::new(Settings::default()))]);
    assert_eq!(h.log().renders(), renders);
}

#[test]
fn shutdown_releases_everything() {
    let mut h = Harness::new();
    h.engine.toggle_visibility();
    h.engine.shutdown();

    assert!(!h.engine.is_sampling());
    assert!(h.engine.active_binding().is_none());
    let log = h.log();
    assert_eq!(log.hides(), 1);
    assert_eq!(log.unregistered, vec!["Ctrl+Alt+C"]);
}
