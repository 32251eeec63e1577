//! Tick clock driving the interpolation loop
//!
//! A dedicated thread fires [`ScrollEngine::tick`] at the display-refresh
//! cadence while an animation is in flight. The thread disarms itself when
//! the engine reports convergence; `arm` is idempotent and `stop` is
//! synchronous: once it returns, no further pulse reaches the sink.

use crate::engine::ScrollEngine;
use crate::hook::traits::PulseSink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

pub struct TickClock {
    engine: Arc<ScrollEngine>,
    sink: Arc<dyn PulseSink>,
    interval: Duration,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TickClock {
    /// Create the clock handle. Created once at startup; `arm`/`stop` may
    /// be called many times over its life.
    pub fn new(engine: Arc<ScrollEngine>, sink: Arc<dyn PulseSink>, interval: Duration) -> Self {
        Self {
            engine,
            sink,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Start the tick thread if it is not already running.
    ///
    /// Returns true if this call armed the clock, false if it was armed
    /// already. The thread runs until the engine converges, then clears
    /// the running flag and exits on its own.
    pub fn arm(&self) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        // Reap the previous thread; it has already exited or is about to.
        if let Some(finished) = self.handle.lock().take() {
            let _ = finished.join();
        }

        let engine = self.engine.clone();
        let sink = self.sink.clone();
        let running = self.running.clone();
        let interval = self.interval;

        let handle = std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let frame_start = Instant::now();

                let outcome = engine.tick();
                sink.emit(outcome.vertical, outcome.horizontal);

                if outcome.converged {
                    running.store(false, Ordering::SeqCst);
                    break;
                }

                // Stay on cadence; the tick itself is sub-frame cheap.
                let elapsed = frame_start.elapsed();
                if elapsed < interval {
                    std::thread::sleep(interval - elapsed);
                }
            }
        });
        *self.handle.lock() = Some(handle);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the tick thread and wait for it. After this returns no further
    /// pulse is emitted. Safe to call when the clock is already idle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}
