//! Lifecycle controller
//!
//! Owns the pieces that outlive any single gesture: the two OS hooks, the
//! tick clock, and the watchdog that re-arms a hook the OS silently
//! disabled. `start` and `stop` are idempotent and `stop` is safe even if
//! `start` never ran.

use crate::clock::TickClock;
use crate::config::Config;
use crate::engine::ScrollEngine;
use crate::hook::traits::{HookBackend, HookResult, InputHook, PulseSink};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct ScrollHandler {
    config: Arc<Config>,
    engine: Arc<ScrollEngine>,
    clock: Arc<TickClock>,
    backend: Arc<dyn HookBackend>,
    hooks: Mutex<Vec<Arc<dyn InputHook>>>,
    watchdog: Mutex<Option<tokio::task::JoinHandle<()>>>,
    running: AtomicBool,
}

impl ScrollHandler {
    pub fn new(config: Config, backend: Arc<dyn HookBackend>, sink: Arc<dyn PulseSink>) -> Self {
        let config = Arc::new(config);
        let engine = Arc::new(ScrollEngine::new(config.tuning()));
        let clock = Arc::new(TickClock::new(
            engine.clone(),
            sink,
            config.tick_interval(),
        ));
        Self {
            config,
            engine,
            clock,
            backend,
            hooks: Mutex::new(Vec::new()),
            watchdog: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Arm both hooks and spawn the watchdog. A second call while running
    /// is a no-op. Must be called from within a tokio runtime.
    pub fn start(&self) -> HookResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let scroll = match self.backend.start_scroll_hook(
            self.engine.clone(),
            self.clock.clone(),
            self.config.clone(),
        ) {
            Ok(hook) => hook,
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };
        let hotkey = match self.backend.start_hotkey_hook(self.engine.clone()) {
            Ok(hook) => hook,
            Err(e) => {
                scroll.shutdown();
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let hooks = vec![scroll, hotkey];
        *self.hooks.lock() = hooks.clone();
        *self.watchdog.lock() = Some(Self::spawn_watchdog(
            hooks,
            self.config.watchdog_interval(),
        ));

        tracing::info!("Scroll handling started");
        Ok(())
    }

    /// Tear down the watchdog, the clock, and both hooks.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(watchdog) = self.watchdog.lock().take() {
            watchdog.abort();
        }
        self.clock.stop();
        for hook in self.hooks.lock().drain(..) {
            hook.shutdown();
        }

        tracing::info!("Scroll handling stopped");
    }

    // Event taps can be disabled by the OS under load. Polling every
    // couple of seconds and re-enabling costs nothing and makes the
    // failure invisible to the user.
    fn spawn_watchdog(
        hooks: Vec<Arc<dyn InputHook>>,
        interval: std::time::Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                for hook in &hooks {
                    if !hook.is_enabled() {
                        tracing::warn!("Event hook found disabled; re-enabling");
                        hook.set_enabled(true);
                    }
                }
            }
        })
    }
}

impl Drop for ScrollHandler {
    fn drop(&mut self) {
        // The clock thread must not outlive the handler; hooks hold only
        // Arcs and shut down via stop().
        self.clock.stop();
    }
}
