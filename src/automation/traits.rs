// Copyright (c) 2024 Mike Tsao

use crate::types::{Normal, Tempo};
use core::fmt::Debug;

/// Something that an [AutomationEngine](super::AutomationEngine) drives. The
/// audio subsystem implements this so that automated parameters actually
/// change what you hear and see.
///
/// Setters are fallible because the thing on the other end might be gone or
/// busy. The engine logs a failure and moves on to the next parameter.
pub trait AutomationSink: Send + Debug {
    /// Sets the playback tempo.
    fn set_tempo(&mut self, tempo: Tempo) -> anyhow::Result<()>;

    /// Sets the bass voice's loudness.
    fn set_bass_intensity(&mut self, level: Normal) -> anyhow::Result<()>;
}
