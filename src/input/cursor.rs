//! Pointer sampling.
//!
//! [`CursorTracker`] polls a platform [`CursorSource`] on a dedicated thread
//! and publishes [`AppEvent::CursorMoved`] onto the event bus whenever the
//! pointer position changes. Each `start()` opens a new session; the
//! dispatcher drops events from any session other than the running one, so
//! samples queued before a `stop()` are never drawn.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, trace};

use crate::error::CoreError;
use crate::events::{AppEvent, EventPublisher};
use crate::geometry::CursorSample;
use crate::model::{DisplayLayout, Point};

/// OS-global pointer position provider.
pub trait CursorSource: Send + Sync {
    /// Called once per `start()`. Returns `PermissionDenied` when the OS
    /// refuses global pointer observation.
    fn ensure_access(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Current pointer position in desktop coordinates.
    ///
    /// `Ok(None)` means "temporarily unavailable" (secure desktop, session
    /// switch); the tracker keeps its last sample.
    fn pointer_position(&self) -> Result<Option<Point>, CoreError>;
}

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct CursorTracker {
    source: Arc<dyn CursorSource>,
    layout: Arc<RwLock<DisplayLayout>>,
    interval_ms: Arc<AtomicU64>,
    session: u64,
    worker: Option<Worker>,
}

impl CursorTracker {
    pub fn new(source: Arc<dyn CursorSource>, layout: DisplayLayout, interval: Duration) -> Self {
        Self {
            source,
            layout: Arc::new(RwLock::new(layout)),
            interval_ms: Arc::new(AtomicU64::new(interval.as_millis() as u64)),
            session: 0,
            worker: None,
        }
    }

    /// Begin sampling. No-op if already running. Returns the session id.
    pub fn start(&mut self, publisher: EventPublisher) -> Result<u64, CoreError> {
        if self.is_running() {
            return Ok(self.session);
        }
        self.source.ensure_access()?;

        self.session += 1;
        let session = self.session;
        let running = Arc::new(AtomicBool::new(true));
        let ctx = SampleLoop {
            source: self.source.clone(),
            layout: self.layout.clone(),
            interval_ms: self.interval_ms.clone(),
            running: running.clone(),
            session,
            publisher,
        };
        let handle = thread::Builder::new()
            .name("cursor-tracker".into())
            .spawn(move || ctx.run())?;
        self.worker = Some(Worker { running, handle });
        debug!(session, "cursor tracker started");
        Ok(session)
    }

    /// Halt sampling and wait for the thread to exit.
    ///
    /// Safe to call at any time, including repeatedly. Once it returns no
    /// further events are published for the stopped session.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.running.store(false, Ordering::Release);
        worker.handle.thread().unpark();
        if worker.handle.thread().id() != thread::current().id() && worker.handle.join().is_err() {
            error!("cursor tracker thread panicked");
        }
        debug!(session = self.session, "cursor tracker stopped");
    }

    /// True while a sampling thread is alive and has not hit a fatal error.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|w| w.running.load(Ordering::Acquire) && !w.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether an event from `session` should still be acted on.
    pub fn accepts(&self, session: u64) -> bool {
        self.worker.is_some() && session == self.session
    }

    /// Replace the monitor layout used to resolve pointer ownership.
    pub fn set_layout(&self, layout: DisplayLayout) {
        let mut guard = self.layout.write().unwrap_or_else(|e| e.into_inner());
        *guard = layout;
    }

    /// Takes effect on the next sampling tick.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ms
            .store(interval.as_millis() as u64, Ordering::Release);
    }

    /// One synchronous sample, resolved against the current layout.
    pub fn sample_now(&self) -> Result<Option<CursorSample>, CoreError> {
        let Some(p) = self.source.pointer_position()? else {
            return Ok(None);
        };
        let layout = self.layout.read().unwrap_or_else(|e| e.into_inner());
        Ok(resolve(&layout, p))
    }
}

impl Drop for CursorTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn resolve(layout: &DisplayLayout, p: Point) -> Option<CursorSample> {
    layout.monitor_at(p).map(|m| CursorSample {
        x: p.x,
        y: p.y,
        monitor: m.id,
        scale: m.scale,
        timestamp: Instant::now(),
    })
}

struct SampleLoop {
    source: Arc<dyn CursorSource>,
    layout: Arc<RwLock<DisplayLayout>>,
    interval_ms: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    session: u64,
    publisher: EventPublisher,
}

impl SampleLoop {
    fn run(self) {
        let mut last: Option<Point> = None;
        let mut lost = false;

        while self.running.load(Ordering::Acquire) {
            match self.source.pointer_position() {
                Ok(Some(p)) => {
                    let sample = {
                        let layout = self.layout.read().unwrap_or_else(|e| e.into_inner());
                        resolve(&layout, p)
                    };
                    match sample {
                        Some(sample) => {
                            lost = false;
                            if last != Some(p) {
                                last = Some(p);
                                self.emit(AppEvent::CursorMoved {
                                    session: self.session,
                                    sample,
                                });
                            }
                        }
                        None if !lost => {
                            lost = true;
                            trace!(x = p.x, y = p.y, "pointer outside all monitors");
                            self.emit(AppEvent::CursorLost {
                                session: self.session,
                            });
                        }
                        None => {}
                    }
                }
                Ok(None) => {}
                Err(err) => match err.fault() {
                    Some(fault) => {
                        error!(error = %err, "cursor tracking failed");
                        self.emit(AppEvent::FeatureFailed(fault));
                        self.running.store(false, Ordering::Release);
                        break;
                    }
                    None => debug!(error = %err, "pointer query failed"),
                },
            }

            let ms = self.interval_ms.load(Ordering::Acquire).max(1);
            thread::park_timeout(Duration::from_millis(ms));
        }
    }

    fn emit(&self, event: AppEvent) {
        if self.running.load(Ordering::Acquire) {
            self.publisher.publish(event);
        }
    }
}
