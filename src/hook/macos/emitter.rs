//! Synthetic scroll event emission (macOS)

use crate::hook::traits::PulseSink;
use core_graphics::event::{CGEvent, CGEventTapLocation, ScrollEventUnit};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

/// Posts pixel-unit scroll events back into the HID stream. Emission is
/// fire-and-forget: if the event cannot be created the pulse is dropped
/// and the animation simply continues on the next tick.
pub struct ScrollEmitter;

impl PulseSink for ScrollEmitter {
    fn emit(&self, vertical: i32, horizontal: i32) {
        let Ok(source) = CGEventSource::new(CGEventSourceStateID::HIDSystemState) else {
            return;
        };
        let Ok(event) =
            CGEvent::new_scroll_event(source, ScrollEventUnit::PIXEL, 2, vertical, horizontal, 0)
        else {
            return;
        };
        event.post(CGEventTapLocation::HID);
    }
}
