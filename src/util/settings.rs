// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about various parts of the
//! system. Intended to be serialized.

use crate::{audio_visual::VisualizerKind, prelude::*};
use core::time::Duration;
use derivative::Derivative;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Loads and saves settings as JSON.
pub trait JsonSettings: Serialize + DeserializeOwned + HasSettings + Sized {
    /// Parses settings. The result counts as saved, since it matches what's on
    /// disk.
    fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Serializes settings and marks them clean.
    fn to_json(&mut self) -> anyhow::Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        self.mark_clean();
        Ok(json)
    }
}
impl<T: Serialize + DeserializeOwned + HasSettings> JsonSettings for T {}

/// Contains persistent automation settings.
#[derive(Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct AutomationSettings {
    /// How often the scheduler ticks while automation is active.
    #[derivative(Default(value = "60"))]
    #[serde(default = "AutomationSettings::default_frames_per_second")]
    frames_per_second: u32,

    /// Whether engine mutations should produce user-facing notifications.
    #[derivative(Default(value = "true"))]
    #[serde(default = "AutomationSettings::default_notifications_enabled")]
    notifications_enabled: bool,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for AutomationSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
#[allow(missing_docs)]
impl AutomationSettings {
    fn default_frames_per_second() -> u32 {
        60
    }

    fn default_notifications_enabled() -> bool {
        true
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    /// Zero frames per second makes no sense, so it's treated as one.
    pub fn set_frames_per_second(&mut self, frames_per_second: u32) {
        let frames_per_second = frames_per_second.max(1);
        if frames_per_second != self.frames_per_second {
            self.frames_per_second = frames_per_second;
            self.needs_save();
        }
    }

    /// The time between scheduler ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frames_per_second.max(1) as f64)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        if enabled != self.notifications_enabled {
            self.notifications_enabled = enabled;
            self.needs_save();
        }
    }
}

/// The audio/visual state a session starts with.
#[derive(Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct AudioVisualSettings {
    #[derivative(Default(value = "Normal::new(0.5)"))]
    pub(crate) volume: Normal,
    pub(crate) tempo: Tempo,
    #[derivative(Default(value = "Normal::new(0.7)"))]
    pub(crate) bass_intensity: Normal,
    #[derivative(Default(value = "Normal::new(0.6)"))]
    pub(crate) melody_intensity: Normal,
    #[derivative(Default(
        value = "vec![VisualizerKind::Diamond, VisualizerKind::Circles, VisualizerKind::Lines]"
    ))]
    pub(crate) active_visualizers: Vec<VisualizerKind>,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for AudioVisualSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl AudioVisualSettings {
    /// Remembers a new starting volume.
    pub fn set_volume(&mut self, volume: Normal) {
        if volume != self.volume {
            self.volume = volume;
            self.needs_save();
        }
    }

    /// Remembers a new starting tempo.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        if tempo != self.tempo {
            self.tempo = tempo;
            self.needs_save();
        }
    }
}
