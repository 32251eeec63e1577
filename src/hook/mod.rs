//! OS input hooks
//!
//! Platform-specific interception of scroll-wheel and modifier-key events,
//! behind the capability traits in [`traits`]. The decoded-event handling
//! shared by every platform lives in [`event`].

pub mod event;
pub mod traits;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

pub use traits::{HookBackend, HookError, HookResult, InputHook, NullSink, PulseSink};

use std::sync::Arc;

/// The hook backend for the current platform.
pub fn platform_backend() -> Arc<dyn HookBackend> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::MacosBackend)
    }

    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsBackend)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        Arc::new(UnsupportedBackend)
    }
}

/// The synthetic scroll emitter for the current platform.
pub fn platform_sink() -> Arc<dyn PulseSink> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::emitter::ScrollEmitter)
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(NullSink)
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
struct UnsupportedBackend;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl HookBackend for UnsupportedBackend {
    fn start_scroll_hook(
        &self,
        _engine: Arc<crate::engine::ScrollEngine>,
        _clock: Arc<crate::clock::TickClock>,
        _config: Arc<crate::config::Config>,
    ) -> HookResult<Arc<dyn InputHook>> {
        Err(HookError::Platform(
            "No input hook support on this platform".to_string(),
        ))
    }

    fn start_hotkey_hook(
        &self,
        _engine: Arc<crate::engine::ScrollEngine>,
    ) -> HookResult<Arc<dyn InputHook>> {
        Err(HookError::Platform(
            "No input hook support on this platform".to_string(),
        ))
    }
}
