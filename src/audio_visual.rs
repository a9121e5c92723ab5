// Copyright (c) 2024 Mike Tsao

//! The audio/visual state that automation drives and the renderer reads.

use crate::{
    automation::AutomationSink,
    traits::HasSettings,
    types::{Normal, Tempo},
    util::AudioVisualSettings,
};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AudioVisualHandle, AudioVisualSnapshot, AudioVisualState, SpectrumSnapshot,
        VisualizerKind,
    };
}

/// The visual modes that can be layered on screen.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)]
pub enum VisualizerKind {
    Diamond,
    Circles,
    Lines,
    Maze,
    Bars,
    Spiral,
}

/// Magnitudes for a fixed number of frequency bins, lowest frequency first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSnapshot(Vec<f32>);
impl Default for SpectrumSnapshot {
    fn default() -> Self {
        Self(vec![0.0; Self::BIN_COUNT])
    }
}
impl SpectrumSnapshot {
    /// Every snapshot has exactly this many bins.
    pub const BIN_COUNT: usize = 64;

    /// Pads with zeros or truncates to [SpectrumSnapshot::BIN_COUNT].
    pub fn from_magnitudes(magnitudes: &[f32]) -> Self {
        let mut bins = magnitudes.to_vec();
        bins.resize(Self::BIN_COUNT, 0.0);
        Self(bins)
    }

    #[allow(missing_docs)]
    pub fn bins(&self) -> &[f32] {
        &self.0
    }
}

/// What the renderer needs each frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AudioVisualSnapshot {
    #[allow(missing_docs)]
    pub spectrum: SpectrumSnapshot,
    #[allow(missing_docs)]
    pub is_playing: bool,
}

/// Playback controls and the latest analysis of what's playing.
#[derive(Debug, Default)]
pub struct AudioVisualState {
    is_playing: bool,
    volume: Normal,
    tempo: Tempo,
    bass_intensity: Normal,
    melody_intensity: Normal,
    active_visualizers: Vec<VisualizerKind>,
    spectrum: SpectrumSnapshot,
}
#[allow(missing_docs)]
impl AudioVisualState {
    /// Starts paused, with everything else from `settings`.
    pub fn new_with(settings: &AudioVisualSettings) -> Self {
        Self {
            is_playing: false,
            volume: settings.volume,
            tempo: settings.tempo,
            bass_intensity: settings.bass_intensity,
            melody_intensity: settings.melody_intensity,
            active_visualizers: settings.active_visualizers.clone(),
            spectrum: SpectrumSnapshot::default(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Returns the new play state.
    pub fn toggle_play(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    pub fn volume(&self) -> Normal {
        self.volume
    }

    pub fn set_volume(&mut self, volume: Normal) {
        self.volume = volume;
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Stores `tempo`, limited to what playback can handle.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo.clamped();
    }

    pub fn bass_intensity(&self) -> Normal {
        self.bass_intensity
    }

    pub fn set_bass_intensity(&mut self, level: Normal) {
        self.bass_intensity = level;
    }

    pub fn melody_intensity(&self) -> Normal {
        self.melody_intensity
    }

    pub fn set_melody_intensity(&mut self, level: Normal) {
        self.melody_intensity = level;
    }

    /// In the order they were turned on.
    pub fn active_visualizers(&self) -> &[VisualizerKind] {
        &self.active_visualizers
    }

    /// Turns `kind` off if it's on, and on (at the end of the list) if it's
    /// off. Returns whether it's now on.
    pub fn toggle_visualizer(&mut self, kind: VisualizerKind) -> bool {
        if let Some(index) = self.active_visualizers.iter().position(|k| *k == kind) {
            self.active_visualizers.remove(index);
            false
        } else {
            self.active_visualizers.push(kind);
            true
        }
    }

    /// Stores the latest analyzer output.
    pub fn update_spectrum(&mut self, magnitudes: &[f32]) {
        self.spectrum = SpectrumSnapshot::from_magnitudes(magnitudes);
    }

    pub fn snapshot(&self) -> AudioVisualSnapshot {
        AudioVisualSnapshot {
            spectrum: self.spectrum.clone(),
            is_playing: self.is_playing,
        }
    }

    /// Copies the current controls into `settings` so they're restored next
    /// time.
    pub fn save_to(&self, settings: &mut AudioVisualSettings) {
        settings.set_volume(self.volume);
        settings.set_tempo(self.tempo);
        if settings.bass_intensity != self.bass_intensity
            || settings.melody_intensity != self.melody_intensity
            || settings.active_visualizers != self.active_visualizers
        {
            settings.bass_intensity = self.bass_intensity;
            settings.melody_intensity = self.melody_intensity;
            settings.active_visualizers = self.active_visualizers.clone();
            settings.needs_save();
        }
    }
}

/// A shareable reference to an [AudioVisualState]. Clones point to the same
/// state, so the engine can own one as its sink while the UI keeps another.
#[derive(Debug, Default)]
pub struct AudioVisualHandle(pub Arc<RwLock<AudioVisualState>>);
impl Clone for AudioVisualHandle {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
impl AudioVisualHandle {
    #[allow(missing_docs)]
    pub fn new_with(state: AudioVisualState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    /// Read access, or an error if a writer panicked.
    pub fn read(&self) -> anyhow::Result<RwLockReadGuard<'_, AudioVisualState>> {
        self.0
            .read()
            .map_err(|_| anyhow!("audio/visual state is poisoned"))
    }

    /// Write access, or an error if a writer panicked.
    pub fn write(&self) -> anyhow::Result<RwLockWriteGuard<'_, AudioVisualState>> {
        self.0
            .write()
            .map_err(|_| anyhow!("audio/visual state is poisoned"))
    }

    #[allow(missing_docs)]
    pub fn snapshot(&self) -> anyhow::Result<AudioVisualSnapshot> {
        Ok(self.read()?.snapshot())
    }
}
impl AutomationSink for AudioVisualHandle {
    fn set_tempo(&mut self, tempo: Tempo) -> anyhow::Result<()> {
        self.write()?.set_tempo(tempo);
        Ok(())
    }

    fn set_bass_intensity(&mut self, level: Normal) -> anyhow::Result<()> {
        self.write()?.set_bass_intensity(level);
        Ok(())
    }
}
