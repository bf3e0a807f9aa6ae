//! Radar-ping pulse animation
//!
//! Each pulsing marker carries a scale factor that walks from 1.0 to 2.0 and
//! wraps. Opacity ramps 0 -> 1 over the first half of the cycle and 1 -> 0
//! over the second, producing the expand-and-fade ping. Period is
//! `1.0 / step` frames.

use bevy::prelude::*;
use rand::Rng;

/// Animation state for one pulsing marker mesh.
///
/// The scale factor starts at a random point in [1.0, 2.0) so markers
/// spawned together do not ping in lockstep.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pulse {
    pub base_size: f32,
    pub scale_factor: f32,
}

/// One frame of pulse output: uniform scale plus material opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    pub scale: f32,
    pub opacity: f32,
}

impl Pulse {
    pub fn new(base_size: f32) -> Self {
        Self {
            base_size,
            scale_factor: rand::thread_rng().gen_range(1.0..2.0),
        }
    }

    /// Deterministic constructor, used by tests and by markers that must
    /// start a cycle from its beginning.
    pub fn with_phase(base_size: f32, scale_factor: f32) -> Self {
        Self {
            base_size,
            scale_factor,
        }
    }

    /// Advance one frame.
    ///
    /// When the factor overshoots 2.0 it resets to 1.0 for the next tick and
    /// this frame reports opacity 0. With large steps that skips part of the
    /// fade-out; the visual discontinuity is an accepted approximation and
    /// must not be smoothed away.
    pub fn tick(&mut self, step: f32) -> PulseFrame {
        self.scale_factor += step;
        if self.scale_factor > 2.0 {
            self.scale_factor = 1.0;
            return PulseFrame {
                scale: self.base_size * self.scale_factor,
                opacity: 0.0,
            };
        }
        let opacity = if self.scale_factor <= 1.5 {
            (self.scale_factor - 1.0) * 2.0
        } else {
            1.0 - (self.scale_factor - 1.5) * 2.0
        };
        PulseFrame {
            scale: self.base_size * self.scale_factor,
            opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_invariants_hold_for_ten_thousand_ticks() {
        let mut pulse = Pulse::with_phase(1.0, 1.0);
        for tick in 0..10_000 {
            let frame = pulse.tick(0.007);
            assert!(
                (0.0..=1.0).contains(&frame.opacity),
                "opacity {} out of range at tick {tick}",
                frame.opacity
            );
            assert!(
                (1.0..=2.0).contains(&pulse.scale_factor),
                "scale factor {} out of range at tick {tick}",
                pulse.scale_factor
            );
        }
    }

    #[test]
    fn test_half_step_sequence() {
        // 1.0 -> 1.5 (opacity 1.0) -> 2.0 (opacity 0.0) -> reset to 1.0
        let mut pulse = Pulse::with_phase(2.0, 1.0);

        let f1 = pulse.tick(0.5);
        assert!((pulse.scale_factor - 1.5).abs() < EPSILON);
        assert!((f1.opacity - 1.0).abs() < EPSILON);
        assert!((f1.scale - 3.0).abs() < EPSILON);

        let f2 = pulse.tick(0.5);
        assert!((pulse.scale_factor - 2.0).abs() < EPSILON);
        assert!(f2.opacity.abs() < EPSILON);

        pulse.tick(0.5);
        assert!((pulse.scale_factor - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_ramp_up_then_down() {
        let mut pulse = Pulse::with_phase(1.0, 1.0);
        let rising = pulse.tick(0.25); // 1.25
        assert!((rising.opacity - 0.5).abs() < EPSILON);
        pulse.tick(0.25); // 1.5
        let falling = pulse.tick(0.25); // 1.75
        assert!((falling.opacity - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_invariants_under_non_uniform_steps() {
        // Threshold logic must hold for delta-time style jittered steps.
        let steps = [0.003, 0.011, 0.25, 0.0, 0.7, 0.07, 1.4, 0.002];
        let mut pulse = Pulse::with_phase(0.5, 1.9);
        for _ in 0..1_000 {
            for step in steps {
                let frame = pulse.tick(step);
                assert!((0.0..=1.0).contains(&frame.opacity));
                assert!((1.0..=2.0).contains(&pulse.scale_factor));
            }
        }
    }

    #[test]
    fn test_random_phase_in_range() {
        for _ in 0..100 {
            let pulse = Pulse::new(1.0);
            assert!((1.0..2.0).contains(&pulse.scale_factor));
        }
    }
}
