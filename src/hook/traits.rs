//! Capability traits at the OS boundary
//!
//! The engine never talks to the OS directly. Platform modules implement
//! these traits; tests substitute mocks.

use crate::clock::TickClock;
use crate::config::Config;
use crate::engine::ScrollEngine;
use std::sync::Arc;
use thiserror::Error;

/// Errors from arming the OS-level input hooks.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type HookResult<T> = Result<T, HookError>;

/// Synthetic scroll event emitter. Fire-and-forget: an emitter that cannot
/// deliver drops the pulse silently and the animation carries on.
pub trait PulseSink: Send + Sync {
    fn emit(&self, vertical: i32, horizontal: i32);
}

/// A sink that discards every pulse. Used on platforms without an emitter.
pub struct NullSink;

impl PulseSink for NullSink {
    fn emit(&self, _vertical: i32, _horizontal: i32) {}
}

/// Handle to a running OS event hook.
///
/// The OS may silently disable a hook under load; the watchdog polls
/// `is_enabled` and re-arms through `set_enabled`. `shutdown` tears the
/// hook down and is safe to call more than once.
pub trait InputHook: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
    fn shutdown(&self);
}

/// Factory for the two hooks a platform provides: the scroll-wheel
/// interception tap and the listen-only hotkey tap.
pub trait HookBackend: Send + Sync {
    fn start_scroll_hook(
        &self,
        engine: Arc<ScrollEngine>,
        clock: Arc<TickClock>,
        config: Arc<Config>,
    ) -> HookResult<Arc<dyn InputHook>>;

    fn start_hotkey_hook(&self, engine: Arc<ScrollEngine>) -> HookResult<Arc<dyn InputHook>>;
}
