// Copyright (c) 2024 Mike Tsao

use super::types::{AutomationConfig, AutomationPattern};
use core::{f64::consts::PI, time::Duration};

impl AutomationConfig {
    /// Milliseconds per minute, the unit in which `speed` is expressed.
    const MS_PER_MINUTE: f64 = 60_000.0;

    /// Steps per cycle for [AutomationPattern::Random].
    pub const RANDOM_STEPS_PER_CYCLE: f64 = 4.0;

    /// Where in its cycle the oscillation is after `elapsed`, in `[0, 1)`.
    pub fn cycle_position(&self, elapsed: Duration) -> f64 {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let position =
            (elapsed_ms / Self::MS_PER_MINUTE * self.speed + self.phase).rem_euclid(1.0);

        // rem_euclid() can round up to exactly 1.0 for tiny negative inputs.
        if position >= 1.0 {
            0.0
        } else {
            position
        }
    }

    /// Computes the automated value after `elapsed`. This is a pure function
    /// of the config and the time, so calling it twice with the same inputs
    /// yields bit-identical results.
    pub fn evaluate(&self, elapsed: Duration) -> f64 {
        self.evaluate_at_position(self.cycle_position(elapsed))
    }

    /// Like [AutomationConfig::evaluate()], but for a known cycle position.
    pub fn evaluate_at_position(&self, cycle: f64) -> f64 {
        let value = match self.pattern {
            AutomationPattern::Linear => self.interpolate(Self::fold(cycle)),
            AutomationPattern::Exponential => self.interpolate(Self::fold(cycle).powi(2)),
            AutomationPattern::Sine => self.interpolate(((cycle * PI * 2.0).sin() + 1.0) / 2.0),
            AutomationPattern::Random => {
                // Hashing through sin() makes each step's value a fixed
                // function of (step, phase). The visuals depend on it
                // repeating, so don't swap in a real PRNG.
                let step = (cycle * Self::RANDOM_STEPS_PER_CYCLE).floor();
                let pseudo_random = (step * 12345.6789 + self.phase * 1000.0).sin();
                self.interpolate((pseudo_random + 1.0) / 2.0)
            }
        };

        value.max(self.min_value).min(self.max_value)
    }

    /// Folds a cycle position into a triangle: 0 at the ends, 1 at the middle.
    fn fold(cycle: f64) -> f64 {
        if cycle <= 0.5 {
            cycle * 2.0
        } else {
            2.0 - cycle * 2.0
        }
    }

    /// Maps `t` in `[0, 1]` onto `[min_value, max_value]`. Never forms
    /// `max_value - min_value`, which overflows for bounds near f64::MAX.
    fn interpolate(&self, t: f64) -> f64 {
        self.min_value * (1.0 - t) + self.max_value * t
    }
}
