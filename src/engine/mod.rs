//! Scroll smoothing engine
//!
//! Holds the shared animation state and implements the two halves of the
//! producer/consumer pair: `ingest` merges raw wheel deltas into the
//! target buffer on the event-tap thread, `tick` advances the animated
//! position toward that target on the clock thread. A single mutex guards
//! the whole bundle so the direction check and the buffer write can never
//! tear between the two threads.

pub mod filter;
pub mod interpolator;

use filter::StartupFilter;
use parking_lot::Mutex;

/// A (vertical, horizontal) scroll offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPair {
    pub vertical: f64,
    pub horizontal: f64,
}

impl AxisPair {
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }
}

/// Numeric tunables consulted on every ingestion and every tick. Copied
/// out of the loaded config once so hot-path reads are plain field loads.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Multiplier applied to every raw delta before accumulation.
    pub speed: f64,
    /// Fraction of the remaining distance covered per tick.
    pub ease_fraction: f64,
    /// Pulse magnitude below which an axis counts as converged.
    pub precision: f64,
    /// Warm-up window of the startup jitter filter, in pulses.
    pub filter_window: u32,
    /// Logical keycode that flips the axis-swap toggle. 0 disables.
    pub toggle_key: i64,
    /// Logical keycode that flips the smoothing block. 0 disables.
    pub block_key: i64,
}

/// The result of one tick: the damped, axis-swapped pulse in integer
/// scroll units, and whether the animation has converged.
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome {
    pub vertical: i32,
    pub horizontal: i32,
    pub converged: bool,
}

#[derive(Debug)]
struct EngineState {
    /// Offset already animated toward; written only by `tick`, except the
    /// reset-to-zero on direction reversal.
    current: AxisPair,
    /// Offset the animation is converging toward; written by `ingest`.
    target: AxisPair,
    /// Most recent raw delta per axis, kept to detect direction flips.
    last_delta: AxisPair,
    swap_axes: bool,
    block_smoothing: bool,
    filter: StartupFilter,
}

pub struct ScrollEngine {
    tuning: Tuning,
    state: Mutex<EngineState>,
}

impl ScrollEngine {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            state: Mutex::new(EngineState {
                current: AxisPair::default(),
                target: AxisPair::default(),
                last_delta: AxisPair::default(),
                swap_axes: false,
                block_smoothing: false,
                filter: StartupFilter::new(tuning.filter_window),
            }),
        }
    }

    /// Merge one classified wheel event into the target buffer.
    ///
    /// Same-direction deltas accumulate; a direction flip replaces the
    /// target with the new scaled delta and discards the in-flight
    /// position on that axis, so the animation never fights an abrupt
    /// reversal. The caller arms the tick clock afterwards.
    pub fn ingest(&self, delta: AxisPair) {
        let speed = self.tuning.speed;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        Self::ingest_axis(
            delta.vertical,
            speed,
            &mut state.target.vertical,
            &mut state.current.vertical,
            &mut state.last_delta.vertical,
        );
        Self::ingest_axis(
            delta.horizontal,
            speed,
            &mut state.target.horizontal,
            &mut state.current.horizontal,
            &mut state.last_delta.horizontal,
        );
    }

    fn ingest_axis(raw: f64, speed: f64, target: &mut f64, current: &mut f64, memory: &mut f64) {
        // A non-negative product means the gesture is continuing (or the
        // memory is still empty) and the delta accumulates.
        if raw * *memory >= 0.0 {
            *target += speed * raw;
        } else {
            *target = speed * raw;
            *current = 0.0;
        }
        *memory = raw;
    }

    /// Advance the animation by one frame.
    ///
    /// Computes the easing pulse per axis, moves the current position,
    /// damps the pulse through the startup filter, applies the axis-swap
    /// toggle, and reports convergence. On convergence the filter is
    /// reset so the next gesture warms up again; positions are left in
    /// place for the accumulator to build on.
    pub fn tick(&self) -> TickOutcome {
        let fraction = self.tuning.ease_fraction;
        let precision = self.tuning.precision;
        let mut state = self.state.lock();

        let pulse = AxisPair::new(
            interpolator::lerp(state.current.vertical, state.target.vertical, fraction),
            interpolator::lerp(state.current.horizontal, state.target.horizontal, fraction),
        );
        state.current.vertical += pulse.vertical;
        state.current.horizontal += pulse.horizontal;

        let (damped_y, damped_x) = state.filter.damp(pulse.vertical, pulse.horizontal);

        // Some mice report a swapped axis themselves while the modifier
        // is held; only remap when the vertical component actually
        // carries the motion.
        let (out_y, out_x) = if state.swap_axes && damped_y != 0.0 {
            (damped_x, damped_y)
        } else {
            (damped_y, damped_x)
        };

        let converged =
            pulse.vertical.abs() <= precision && pulse.horizontal.abs() <= precision;
        if converged {
            state.filter.reset();
        }

        TickOutcome {
            vertical: out_y as i32,
            horizontal: out_x as i32,
            converged,
        }
    }

    /// Flip the axis-swap toggle (hold-to-scroll-horizontally hotkey).
    pub fn toggle_axis_swap(&self) {
        let mut state = self.state.lock();
        state.swap_axes = !state.swap_axes;
        tracing::debug!(active = state.swap_axes, "Axis swap toggled");
    }

    /// Flip the smoothing block. The target snaps to wherever the
    /// animation currently is so nothing jumps when smoothing resumes.
    pub fn toggle_block_smoothing(&self) {
        let mut state = self.state.lock();
        state.block_smoothing = !state.block_smoothing;
        state.target = state.current;
        tracing::debug!(blocked = state.block_smoothing, "Smoothing block toggled");
    }

    pub fn smoothing_blocked(&self) -> bool {
        self.state.lock().block_smoothing
    }

    /// Dispatch a logical (already unified) modifier keycode against the
    /// configured hotkey bindings. Keycode 0 disables a binding.
    pub fn handle_modifier_key(&self, key_code: i64) {
        if self.tuning.toggle_key != 0 && key_code == self.tuning.toggle_key {
            self.toggle_axis_swap();
        }
        if self.tuning.block_key != 0 && key_code == self.tuning.block_key {
            self.toggle_block_smoothing();
        }
    }

    #[cfg(test)]
    pub(crate) fn positions(&self) -> (AxisPair, AxisPair) {
        let state = self.state.lock();
        (state.current, state.target)
    }
}
