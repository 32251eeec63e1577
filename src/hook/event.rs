//! Classified wheel events and the ingestion path
//!
//! Platform taps feed the raw OS fields through [`WheelClassifier`] to get
//! a [`WheelEvent`]; everything from classification on is platform-neutral
//! and unit-testable: step normalization, direction reverse, the
//! smooth-or-pass-through decision, and the logical unification of
//! modifier keycodes.

use crate::clock::TickClock;
use crate::config::EffectiveRule;
use crate::engine::{AxisPair, ScrollEngine};

/// One axis of a decoded scroll event. `precise` marks pixel-exact deltas
/// (continuous or high-resolution devices) that bypass normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisReading {
    pub value: f64,
    pub precise: bool,
}

/// A scroll-wheel event after classification, before smoothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct WheelEvent {
    pub vertical: AxisReading,
    pub horizontal: AxisReading,
}

/// The raw per-axis fields of an OS wheel event: the coarse line count and
/// the fixed-point delta alongside it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawAxis {
    pub line: i64,
    pub fixed: f64,
}

/// Classifies raw axis samples as line-based or precise.
///
/// A high-resolution device reveals itself when its fixed-point delta
/// disagrees with the coarse line count. That disagreement is latched per
/// axis so later samples that happen to land on a whole number keep their
/// magnitude instead of being renormalized mid-gesture.
#[derive(Debug, Default)]
pub struct WheelClassifier {
    precise_vertical: bool,
    precise_horizontal: bool,
}

impl WheelClassifier {
    pub fn classify(&mut self, vertical: RawAxis, horizontal: RawAxis) -> WheelEvent {
        WheelEvent {
            vertical: Self::axis(&mut self.precise_vertical, vertical),
            horizontal: Self::axis(&mut self.precise_horizontal, horizontal),
        }
    }

    fn axis(latch: &mut bool, raw: RawAxis) -> AxisReading {
        if raw.fixed != 0.0 && raw.fixed != raw.line as f64 {
            *latch = true;
        }
        let precise = *latch && raw.fixed != 0.0;
        AxisReading {
            value: if precise { raw.fixed } else { raw.line as f64 },
            precise,
        }
    }
}

/// What the tap should do with the original OS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swallow the original; the smoothed pulses replace it.
    Swallow,
    /// Deliver the original unchanged (smoothing off or blocked).
    PassThrough,
}

/// Left and right shift report distinct keycodes but act as one logical
/// hotkey.
const LEFT_SHIFT: i64 = 56;
const RIGHT_SHIFT: i64 = 60;

pub fn unify_key_code(key_code: i64) -> i64 {
    if key_code == RIGHT_SHIFT {
        LEFT_SHIFT
    } else {
        key_code
    }
}

// Device-independent CGEventFlags modifier bits.
const FLAG_CAPS_LOCK: u64 = 0x1_0000;
const FLAG_SHIFT: u64 = 0x2_0000;
const FLAG_CONTROL: u64 = 0x4_0000;
const FLAG_OPTION: u64 = 0x8_0000;
const FLAG_COMMAND: u64 = 0x10_0000;
const FLAG_FN: u64 = 0x80_0000;

/// Modifier taps fire on both press and release; the toggles are
/// edge-triggered on key-down only. A modifier counts as pressed when its
/// flag bit is set in the event that reported the keycode.
pub fn modifier_is_pressed(key_code: i64, flags: u64) -> bool {
    let mask = match key_code {
        54 | 55 => FLAG_COMMAND,
        56 | 60 => FLAG_SHIFT,
        57 => FLAG_CAPS_LOCK,
        58 | 61 => FLAG_OPTION,
        59 | 62 => FLAG_CONTROL,
        63 => FLAG_FN,
        // Non-modifier keycodes only reach us on key-down.
        _ => return true,
    };
    flags & mask != 0
}

/// Clamp a line-based wheel delta to `±step`. Bursty mice report wildly
/// varying line counts per notch; normalizing to a fixed step keeps the
/// animation speed consistent. Precise deltas already carry meaningful
/// magnitudes and pass through untouched.
pub fn normalize(reading: AxisReading, step: f64) -> f64 {
    if reading.precise || reading.value == 0.0 {
        reading.value
    } else {
        reading.value.signum() * step
    }
}

/// Run one classified wheel event through the smoothing decision.
///
/// Returns [`Disposition::PassThrough`] when the effective rule disables
/// smoothing or the hotkey block is active; otherwise ingests the
/// normalized (and possibly reversed) delta and arms the tick clock.
pub fn handle_wheel(
    engine: &ScrollEngine,
    clock: &TickClock,
    rule: EffectiveRule,
    event: WheelEvent,
    step: f64,
) -> Disposition {
    if !rule.smooth || engine.smoothing_blocked() {
        return Disposition::PassThrough;
    }

    let mut delta = AxisPair::new(
        normalize(event.vertical, step),
        normalize(event.horizontal, step),
    );
    if rule.reverse {
        delta.vertical = -delta.vertical;
        delta.horizontal = -delta.horizontal;
    }

    engine.ingest(delta);
    clock.arm();
    Disposition::Swallow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tuning;
    use crate::hook::traits::{NullSink, PulseSink};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_engine() -> Arc<ScrollEngine> {
        Arc::new(ScrollEngine::new(Tuning {
            speed: 1.0,
            ease_fraction: 0.15,
            precision: 0.2,
            filter_window: 0,
            toggle_key: 56,
            block_key: 59,
        }))
    }

    fn test_clock(engine: &Arc<ScrollEngine>) -> TickClock {
        let sink: Arc<dyn PulseSink> = Arc::new(NullSink);
        TickClock::new(engine.clone(), sink, Duration::from_millis(10))
    }

    fn rule(smooth: bool, reverse: bool) -> EffectiveRule {
        EffectiveRule { smooth, reverse }
    }

    fn line_event(vertical: f64, horizontal: f64) -> WheelEvent {
        WheelEvent {
            vertical: AxisReading {
                value: vertical,
                precise: false,
            },
            horizontal: AxisReading {
                value: horizontal,
                precise: false,
            },
        }
    }

    #[test]
    fn test_normalize_clamps_line_deltas() {
        let reading = AxisReading {
            value: 7.0,
            precise: false,
        };
        assert_eq!(normalize(reading, 30.0), 30.0);
        let reading = AxisReading {
            value: -1.0,
            precise: false,
        };
        assert_eq!(normalize(reading, 30.0), -30.0);
    }

    #[test]
    fn test_normalize_passes_precise_and_zero() {
        let precise = AxisReading {
            value: 12.5,
            precise: true,
        };
        assert_eq!(normalize(precise, 30.0), 12.5);
        let idle = AxisReading {
            value: 0.0,
            precise: false,
        };
        assert_eq!(normalize(idle, 30.0), 0.0);
    }

    #[test]
    fn test_classifier_keeps_line_wheels_line_based() {
        let mut classifier = WheelClassifier::default();
        let wheel = classifier.classify(
            RawAxis {
                line: 1,
                fixed: 1.0,
            },
            RawAxis::default(),
        );
        assert!(!wheel.vertical.precise);
        assert_eq!(wheel.vertical.value, 1.0);
        assert_eq!(wheel.horizontal.value, 0.0);
    }

    #[test]
    fn test_classifier_latches_high_resolution_axis() {
        let mut classifier = WheelClassifier::default();
        let first = classifier.classify(
            RawAxis {
                line: 2,
                fixed: 2.4,
            },
            RawAxis::default(),
        );
        assert!(first.vertical.precise);
        assert_eq!(first.vertical.value, 2.4);

        // A later sample from the same device can land on a whole number;
        // it must keep its magnitude instead of snapping to the step.
        let whole = classifier.classify(
            RawAxis {
                line: 2,
                fixed: 2.0,
            },
            RawAxis::default(),
        );
        assert!(
            whole.vertical.precise,
            "Whole-number sample from a latched axis stays precise"
        );
        assert_eq!(whole.vertical.value, 2.0);
    }

    #[test]
    fn test_classifier_axes_latch_independently() {
        let mut classifier = WheelClassifier::default();
        classifier.classify(
            RawAxis {
                line: 1,
                fixed: 0.3,
            },
            RawAxis::default(),
        );
        let wheel = classifier.classify(
            RawAxis::default(),
            RawAxis {
                line: 3,
                fixed: 3.0,
            },
        );
        assert!(
            !wheel.horizontal.precise,
            "Vertical latch must not bleed into the horizontal axis"
        );
        assert_eq!(wheel.horizontal.value, 3.0);
    }

    #[test]
    fn test_unify_key_code_folds_right_shift() {
        assert_eq!(unify_key_code(60), 56);
        assert_eq!(unify_key_code(56), 56);
        assert_eq!(unify_key_code(12), 12);
    }

    #[test]
    fn test_modifier_press_and_release_are_distinguished() {
        assert!(
            modifier_is_pressed(56, FLAG_SHIFT),
            "Shift down carries the shift flag"
        );
        assert!(
            !modifier_is_pressed(56, 0),
            "Shift up clears the flag and must not toggle"
        );
        assert!(
            modifier_is_pressed(60, FLAG_SHIFT),
            "Right shift maps onto the same flag"
        );
        assert!(!modifier_is_pressed(59, FLAG_SHIFT));
        assert!(
            modifier_is_pressed(3, 0),
            "Unknown keycodes are treated as key-down"
        );
    }

    #[test]
    fn test_smooth_rule_swallows_and_arms() {
        let engine = test_engine();
        let clock = test_clock(&engine);
        let disposition = handle_wheel(&engine, &clock, rule(true, false), line_event(3.0, 0.0), 30.0);
        assert_eq!(disposition, Disposition::Swallow);
        assert!(clock.is_running(), "Ingestion must arm the tick clock");
        clock.stop();
    }

    #[test]
    fn test_disabled_rule_passes_through() {
        let engine = test_engine();
        let clock = test_clock(&engine);
        let disposition = handle_wheel(&engine, &clock, rule(false, false), line_event(3.0, 0.0), 30.0);
        assert_eq!(disposition, Disposition::PassThrough);
        assert!(!clock.is_running(), "Pass-through must not arm the clock");
    }

    #[test]
    fn test_block_hotkey_passes_through() {
        let engine = test_engine();
        let clock = test_clock(&engine);
        engine.handle_modifier_key(59);
        let disposition = handle_wheel(&engine, &clock, rule(true, false), line_event(3.0, 0.0), 30.0);
        assert_eq!(disposition, Disposition::PassThrough);
    }

    #[test]
    fn test_reverse_negates_normalized_delta() {
        let engine = test_engine();
        let clock = test_clock(&engine);
        handle_wheel(&engine, &clock, rule(true, true), line_event(2.0, 0.0), 30.0);
        clock.stop();
        let (_, target) = engine.positions();
        assert_eq!(
            target.vertical, -30.0,
            "Reversed ingestion must target the opposite direction"
        );
    }
}
