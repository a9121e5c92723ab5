// Copyright (c) 2024 Mike Tsao

//! Stand-in [AutomationSink]s for headless use and for tests.

use super::AutomationSink;
use crate::types::{Normal, Tempo};
use anyhow::anyhow;
use std::sync::{Arc, RwLock};

/// A sink that accepts everything and does nothing with it.
#[derive(Debug, Default)]
pub struct NullSink;
impl AutomationSink for NullSink {
    fn set_tempo(&mut self, _tempo: Tempo) -> anyhow::Result<()> {
        Ok(())
    }

    fn set_bass_intensity(&mut self, _level: Normal) -> anyhow::Result<()> {
        Ok(())
    }
}

/// One call that a [RecordingSink] received.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkCall {
    #[allow(missing_docs)]
    Tempo(Tempo),
    #[allow(missing_docs)]
    BassIntensity(Normal),
}

/// Remembers every call it gets. Clones share the same log, so keep one and
/// give the other to the engine.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    calls: Arc<RwLock<Vec<SinkCall>>>,
    reject_tempo: bool,
}
impl RecordingSink {
    /// A sink whose tempo setter always fails (after recording the call).
    /// Bass intensity still works.
    pub fn new_rejecting_tempo() -> Self {
        Self {
            reject_tempo: true,
            ..Default::default()
        }
    }

    /// Everything received so far, oldest first.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Forgets everything received so far.
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.write() {
            calls.clear();
        }
    }

    fn record(&self, call: SinkCall) -> anyhow::Result<()> {
        self.calls
            .write()
            .map_err(|_| anyhow!("call log is poisoned"))?
            .push(call);
        Ok(())
    }
}
impl AutomationSink for RecordingSink {
    fn set_tempo(&mut self, tempo: Tempo) -> anyhow::Result<()> {
        self.record(SinkCall::Tempo(tempo))?;
        if self.reject_tempo {
            Err(anyhow!("tempo is not accepting changes"))
        } else {
            Ok(())
        }
    }

    fn set_bass_intensity(&mut self, level: Normal) -> anyhow::Result<()> {
        self.record(SinkCall::BassIntensity(level))
    }
}
