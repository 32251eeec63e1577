//! CGEventTap-based scroll and hotkey interception (macOS)
//!
//! Each tap runs on its own thread: the tap is created there, added to
//! that thread's run loop, and the thread parks in `CFRunLoop::run` until
//! shutdown stops the loop. The handle retains the tap's mach port so the
//! watchdog can poll and re-enable it from any thread.

use crate::clock::TickClock;
use crate::config::Config;
use crate::engine::ScrollEngine;
use crate::hook::event::{self, Disposition, RawAxis, WheelClassifier};
use crate::hook::traits::{HookError, HookResult, InputHook};
use core_foundation::base::TCFType;
use core_foundation::mach_port::{CFMachPort, CFMachPortRef};
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop};
use core_graphics::event::{
    CGEvent, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventTapProxy, CGEventType, EventField,
};
use objc2_app_kit::NSWorkspace;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

// Not exposed by the core-graphics wrapper; needed by the watchdog.
extern "C" {
    fn CGEventTapIsEnabled(tap: CFMachPortRef) -> bool;
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

pub struct MacosBackend;

impl crate::hook::traits::HookBackend for MacosBackend {
    fn start_scroll_hook(
        &self,
        engine: Arc<ScrollEngine>,
        clock: Arc<TickClock>,
        config: Arc<Config>,
    ) -> HookResult<Arc<dyn InputHook>> {
        let step = config.step;
        let classifier = Mutex::new(WheelClassifier::default());
        spawn_tap(
            "scroll",
            vec![CGEventType::ScrollWheel],
            CGEventTapOptions::Default,
            move |_proxy, _etype, cg_event| {
                handle_scroll_event(cg_event, &engine, &clock, &config, &classifier, step);
                // The original event was mutated in place; deliver it.
                None
            },
        )
    }

    fn start_hotkey_hook(&self, engine: Arc<ScrollEngine>) -> HookResult<Arc<dyn InputHook>> {
        spawn_tap(
            "hotkey",
            vec![CGEventType::FlagsChanged],
            CGEventTapOptions::ListenOnly,
            move |_proxy, _etype, cg_event| {
                let code = cg_event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
                let flags = cg_event.get_flags().bits();
                if event::modifier_is_pressed(code, flags) {
                    engine.handle_modifier_key(event::unify_key_code(code));
                }
                None
            },
        )
    }
}

fn handle_scroll_event(
    cg_event: &CGEvent,
    engine: &ScrollEngine,
    clock: &TickClock,
    config: &Config,
    classifier: &Mutex<WheelClassifier>,
    step: f64,
) {
    // Trackpads and Magic Mice report continuous scrolling; leave them to
    // the system. Only discrete wheel events get smoothed.
    let continuous =
        cg_event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_IS_CONTINUOUS);
    if continuous != 0 {
        return;
    }

    let rule = config.rule_for(frontmost_bundle_id().as_deref());
    let wheel = classifier.lock().classify(
        RawAxis {
            line: cg_event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_1),
            fixed: cg_event
                .get_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_1),
        },
        RawAxis {
            line: cg_event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_2),
            fixed: cg_event
                .get_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_2),
        },
    );

    match event::handle_wheel(engine, clock, rule, wheel, step) {
        Disposition::Swallow => clear_deltas(cg_event),
        Disposition::PassThrough => {
            if rule.reverse {
                reverse_deltas(cg_event);
            }
        }
    }
}

// The core-graphics tap callback cannot drop an event outright, so a
// swallowed event is delivered with all of its deltas zeroed.
fn clear_deltas(cg_event: &CGEvent) {
    for field in [
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_1,
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_2,
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_1,
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_2,
    ] {
        cg_event.set_integer_value_field(field, 0);
    }
    cg_event.set_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_1, 0.0);
    cg_event.set_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_2, 0.0);
}

fn reverse_deltas(cg_event: &CGEvent) {
    for field in [
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_1,
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_2,
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_1,
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_2,
    ] {
        let value = cg_event.get_integer_value_field(field);
        cg_event.set_integer_value_field(field, -value);
    }
    for field in [
        EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_1,
        EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_2,
    ] {
        let value = cg_event.get_double_value_field(field);
        cg_event.set_double_value_field(field, -value);
    }
}

fn frontmost_bundle_id() -> Option<String> {
    unsafe {
        let workspace = NSWorkspace::sharedWorkspace();
        let app = workspace.frontmostApplication()?;
        app.bundleIdentifier().map(|id| id.to_string())
    }
}

// CF handles are only accessed through thread-safe CGEventTap* calls.
struct TapParts {
    port: CFMachPort,
    run_loop: CFRunLoop,
}

unsafe impl Send for TapParts {}
unsafe impl Sync for TapParts {}

struct MacosHook {
    label: &'static str,
    parts: TapParts,
    thread: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl InputHook for MacosHook {
    fn is_enabled(&self) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        unsafe { CGEventTapIsEnabled(self.parts.port.as_concrete_TypeRef()) }
    }

    fn set_enabled(&self, enabled: bool) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }
        unsafe { CGEventTapEnable(self.parts.port.as_concrete_TypeRef(), enabled) }
    }

    fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        unsafe { CGEventTapEnable(self.parts.port.as_concrete_TypeRef(), false) }
        self.parts.run_loop.stop();
        if let Some(thread) = self.thread.lock().take() {
            let _ = thread.join();
        }
        tracing::info!(label = self.label, "Event tap shut down");
    }
}

/// Create a tap on a dedicated run-loop thread and hand back its handle.
fn spawn_tap<F>(
    label: &'static str,
    events: Vec<CGEventType>,
    options: CGEventTapOptions,
    callback: F,
) -> HookResult<Arc<dyn InputHook>>
where
    F: Fn(CGEventTapProxy, CGEventType, &CGEvent) -> Option<CGEvent> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<HookResult<TapParts>>();

    let thread = std::thread::spawn(move || {
        let tap = match CGEventTap::new(
            CGEventTapLocation::HID,
            CGEventTapPlacement::TailAppendEventTap,
            options,
            events,
            callback,
        ) {
            Ok(tap) => tap,
            Err(()) => {
                let _ = tx.send(Err(HookError::Permission(format!(
                    "Failed to create {} event tap; grant Accessibility permission and retry",
                    label
                ))));
                return;
            }
        };

        let source = match tap.mach_port.create_runloop_source(0) {
            Ok(source) => source,
            Err(()) => {
                let _ = tx.send(Err(HookError::Platform(format!(
                    "Failed to create run loop source for {} tap",
                    label
                ))));
                return;
            }
        };

        let run_loop = CFRunLoop::get_current();
        unsafe {
            run_loop.add_source(&source, kCFRunLoopCommonModes);
        }
        tap.enable();

        let _ = tx.send(Ok(TapParts {
            port: tap.mach_port.clone(),
            run_loop: run_loop.clone(),
        }));

        tracing::info!(label, "Event tap armed");
        CFRunLoop::run_current();
    });

    let parts = rx
        .recv()
        .map_err(|_| HookError::Platform(format!("{} tap thread died during setup", label)))??;

    Ok(Arc::new(MacosHook {
        label,
        parts,
        thread: Mutex::new(Some(thread)),
        stopped: AtomicBool::new(false),
    }))
}
