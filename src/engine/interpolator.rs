//! Exponential easing step for scroll interpolation
//!
//! Each tick advances the animated position by a fixed fraction of the
//! remaining distance to the target, so the motion decelerates as it
//! converges and never overshoots.

/// Compute the next pulse for one axis.
///
/// Returns the increment to apply to `current`, not the new position.
/// The step is a constant fraction of the remaining distance, which gives
/// geometric convergence: successive pulses shrink by `1 - fraction` and
/// the step is exactly zero once `current == target`.
pub fn lerp(current: f64, target: f64, fraction: f64) -> f64 {
    (target - current) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRACTION: f64 = 0.15;

    #[test]
    fn test_step_is_zero_at_target() {
        assert_eq!(lerp(42.0, 42.0, FRACTION), 0.0);
    }

    #[test]
    fn test_step_shrinks_as_distance_shrinks() {
        let far = lerp(0.0, 100.0, FRACTION);
        let near = lerp(90.0, 100.0, FRACTION);
        assert!(
            near.abs() < far.abs(),
            "Pulse {} near the target should be smaller than pulse {} far from it",
            near,
            far
        );
    }

    #[test]
    fn test_converges_without_overshoot() {
        let target = 10.0;
        let mut current = 0.0;
        for _ in 0..200 {
            let pulse = lerp(current, target, FRACTION);
            current += pulse;
            assert!(
                current <= target,
                "Position {} must never overshoot target {}",
                current,
                target
            );
        }
        assert!(
            (target - current).abs() < 0.01,
            "Position {} should have converged close to {}",
            current,
            target
        );
    }

    #[test]
    fn test_negative_target() {
        let mut current = 0.0;
        for _ in 0..200 {
            current += lerp(current, -25.0, FRACTION);
        }
        assert!(
            (current + 25.0).abs() < 0.01,
            "Position {} should converge toward -25",
            current
        );
    }
}
