// Copyright (c) 2024 Mike Tsao

use super::AutomationEngine;
use crate::{
    types::{Clock, ParamUid, SystemClock},
    util::AutomationSettings,
};
use crossbeam::channel::Receiver;
use std::time::{Duration, Instant};

/// What one [AutomationScheduler::tick()] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// The clock reading that every parameter in this tick was evaluated at.
    pub elapsed: Duration,
    /// How many parameters got new values.
    pub updated: usize,
    /// How many of those the sink refused.
    pub failed_deliveries: usize,
}

/// Drives an [AutomationEngine] once per frame while any of its parameters
/// are automated.
///
/// The scheduler owns the frame ticker. It exists only while the scheduler is
/// running; a stopped scheduler hands out a channel that never fires, so a
/// `select!` loop waiting on [AutomationScheduler::frames()] simply idles.
#[derive(Debug)]
pub struct AutomationScheduler {
    clock: Box<dyn Clock>,
    frame_interval: Duration,
    ticker: Option<Receiver<Instant>>,
    never: Receiver<Instant>,
}
impl Default for AutomationScheduler {
    fn default() -> Self {
        Self::new_with(
            Box::<SystemClock>::default(),
            &AutomationSettings::default(),
        )
    }
}
impl AutomationScheduler {
    /// Creates a stopped scheduler that reads time from `clock`.
    pub fn new_with(clock: Box<dyn Clock>, settings: &AutomationSettings) -> Self {
        Self {
            clock,
            frame_interval: settings.frame_interval(),
            ticker: None,
            never: crossbeam::channel::never(),
        }
    }

    /// Starts ticking. Does nothing if already running. Returns whether
    /// anything changed.
    pub fn start(&mut self) -> bool {
        if self.ticker.is_some() {
            return false;
        }
        log::debug!("automation scheduler starting ({:?}/frame)", self.frame_interval);
        self.ticker = Some(crossbeam::channel::tick(self.frame_interval));
        true
    }

    /// Stops ticking and drops the frame ticker. Does nothing if already
    /// stopped. Returns whether anything changed.
    pub fn stop(&mut self) -> bool {
        if self.ticker.take().is_none() {
            return false;
        }
        log::debug!("automation scheduler stopping");
        true
    }

    #[allow(missing_docs)]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Runs if and only if `engine` has a parameter with automation enabled
    /// and a config. Call after every mutation. Returns whether the running
    /// state changed.
    pub fn update_schedule(&mut self, engine: &AutomationEngine) -> bool {
        if engine.has_active_automation() {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Fires once per frame while running.
    pub fn frames(&self) -> &Receiver<Instant> {
        self.ticker.as_ref().unwrap_or(&self.never)
    }

    /// The time between frames.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Does one frame's work: reads the clock once, evaluates every actively
    /// automated parameter at that instant in list order, pushes each value
    /// to the sink, and stores all the new values in one swap.
    ///
    /// A sink failure is logged and counted, and the value is still stored,
    /// so one broken destination can't stall the rest. Does nothing while
    /// stopped.
    pub fn tick(&mut self, engine: &mut AutomationEngine) -> TickReport {
        let elapsed = self.clock.elapsed();
        let mut report = TickReport {
            elapsed,
            ..Default::default()
        };
        if !self.is_running() {
            return report;
        }

        let snapshot = engine.parameters();
        let mut values: Vec<(ParamUid, f64)> = Vec::with_capacity(snapshot.len());
        for param in snapshot.iter() {
            if !param.automation_enabled {
                continue;
            }
            let Some(config) = param.automation_config.as_ref() else {
                continue;
            };
            let value = config.evaluate(elapsed);
            if !value.is_finite() {
                log::warn!(
                    "parameter {} evaluated to {value} at {elapsed:?}; skipping",
                    param.uid
                );
                continue;
            }
            if let Err(e) = engine.deliver(param, value) {
                log::warn!("{e}");
                report.failed_deliveries += 1;
            }
            values.push((param.uid, value));
        }
        report.updated = values.len();
        engine.commit_values(&values);
        report
    }
}
