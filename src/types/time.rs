// Copyright (c) 2024 Mike Tsao

//! Handles musical tempo and the wall-clock time that drives automation.

use core::{fmt, time::Duration};
use derivative::Derivative;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Beats per minute.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Derivative, Display, From, PartialEq, PartialOrd,
)]
#[derivative(Default)]
#[display(fmt = "{:.2} BPM", _0)]
#[serde(rename_all = "kebab-case")]
pub struct Tempo(#[derivative(Default(value = "110.0"))] pub f64);
impl From<Tempo> for f64 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}
impl Tempo {
    /// The largest value we'll allow.
    pub const MAX_VALUE: f64 = 1024.0;

    /// The smallest value we'll allow. Zero stops the music, which is a
    /// legitimate (if boring) thing to automate.
    pub const MIN_VALUE: f64 = 0.0;

    /// Returns a copy limited to [Tempo::MIN_VALUE]..=[Tempo::MAX_VALUE].
    pub fn clamped(&self) -> Self {
        Self(self.0.clamp(Self::MIN_VALUE, Self::MAX_VALUE))
    }
}

/// A monotonic source of elapsed time. Automation is a function of how much
/// time has passed since the clock's origin, never of how many frames were
/// drawn.
pub trait Clock: Send + fmt::Debug {
    /// Time elapsed since this clock's origin. Never decreases.
    fn elapsed(&self) -> Duration;
}

/// The real thing. Its origin is the moment it was created.
#[derive(Debug, Derivative)]
#[derivative(Default)]
pub struct SystemClock {
    #[derivative(Default(value = "Instant::now()"))]
    origin: Instant,
}
impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that moves only when told to. Clones share the same time, so a test
/// can keep one copy and hand another to the code under test.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Arc<AtomicU64>);
impl ManualClock {
    /// Moves the clock forward.
    pub fn advance(&self, duration: Duration) {
        self.0
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Convenience for [ManualClock::advance()] in milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}
impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        Duration::from_micros(self.0.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_mainline() {
        let t = Tempo::default();
        assert_eq!(t.0, 110.0);
        assert_eq!(format!("{}", Tempo(98.5)), "98.50 BPM");
        assert_eq!(Tempo(2000.0).clamped(), Tempo(Tempo::MAX_VALUE));
        assert_eq!(Tempo(-1.0).clamped(), Tempo(Tempo::MIN_VALUE));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let other = clock.clone();
        assert_eq!(other.elapsed(), Duration::ZERO);

        clock.advance_ms(1000);
        assert_eq!(other.elapsed(), Duration::from_millis(1000));

        other.advance(Duration::from_micros(500));
        assert_eq!(clock.elapsed(), Duration::from_micros(1_000_500));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
