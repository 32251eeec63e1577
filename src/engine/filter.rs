//! Startup jitter filter
//!
//! The first few interpolated pulses of a new gesture tend to be visually
//! jarring: raw wheel deltas arrive in bursts and the very first frame of
//! the animation carries the largest step. This filter damps the opening
//! pulses of each gesture with a linear ramp and passes everything after
//! the warm-up window through unchanged.

/// Per-axis warm-up state. Reset when a gesture ends so the next one
/// starts damped again.
#[derive(Debug, Clone)]
pub struct StartupFilter {
    window: u32,
    ticks_y: u32,
    ticks_x: u32,
}

impl StartupFilter {
    pub fn new(window: u32) -> Self {
        Self {
            window,
            ticks_y: 0,
            ticks_x: 0,
        }
    }

    /// Damp a pulse pair according to each axis' progress through the
    /// warm-up window. Pulse `k` (zero-based) is scaled by
    /// `(k + 1) / (window + 1)`, a monotonic ramp that reaches full
    /// pass-through without a visible discontinuity.
    pub fn damp(&mut self, vertical: f64, horizontal: f64) -> (f64, f64) {
        let y = Self::attenuate(vertical, &mut self.ticks_y, self.window);
        let x = Self::attenuate(horizontal, &mut self.ticks_x, self.window);
        (y, x)
    }

    fn attenuate(pulse: f64, ticks: &mut u32, window: u32) -> f64 {
        // An idle axis has not started its gesture; its warm-up begins
        // with its first non-zero pulse.
        if pulse == 0.0 || *ticks >= window {
            return pulse;
        }
        *ticks += 1;
        pulse * (*ticks as f64) / (window as f64 + 1.0)
    }

    /// Restart the warm-up window on both axes. Called when the tick loop
    /// reaches convergence so the next gesture is damped from its first
    /// frame.
    pub fn reset(&mut self) {
        self.ticks_y = 0;
        self.ticks_x = 0;
    }
}
