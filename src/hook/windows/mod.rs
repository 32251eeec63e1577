//! Windows hook stub
//!
//! Low-level mouse/keyboard hooks (`WH_MOUSE_LL`/`WH_KEYBOARD_LL`) are the
//! planned backend here; until then starting a hook reports a platform
//! error.

use crate::clock::TickClock;
use crate::config::Config;
use crate::engine::ScrollEngine;
use crate::hook::traits::{HookBackend, HookError, HookResult, InputHook};
use std::sync::Arc;

pub struct WindowsBackend;

impl HookBackend for WindowsBackend {
    fn start_scroll_hook(
        &self,
        _engine: Arc<ScrollEngine>,
        _clock: Arc<TickClock>,
        _config: Arc<Config>,
    ) -> HookResult<Arc<dyn InputHook>> {
        Err(HookError::Platform(
            "Windows scroll hook not implemented yet".to_string(),
        ))
    }

    fn start_hotkey_hook(&self, _engine: Arc<ScrollEngine>) -> HookResult<Arc<dyn InputHook>> {
        Err(HookError::Platform(
            "Windows hotkey hook not implemented yet".to_string(),
        ))
    }
}
