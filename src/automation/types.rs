// Copyright (c) 2024 Mike Tsao

use super::validation::{validate_config, validate_parameter, ValidationError};
use crate::{types::ParamUid, util::Rng};
use core::time::Duration;
use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Which subsystem setter receives a parameter's automated value.
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
pub enum ParameterKind {
    /// Playback tempo, in beats per minute.
    #[serde(rename = "BPM")]
    #[strum(serialize = "BPM")]
    Tempo,
    /// Loudness of the bass voice, 0..=1.
    #[serde(rename = "bass-intensity")]
    #[strum(serialize = "bass-intensity")]
    BassIntensity,
    /// Reserved for visualizer properties. Nothing consumes it yet.
    #[serde(rename = "visualizer-property")]
    #[strum(serialize = "visualizer-property")]
    VisualizerProperty,
}
impl From<ParameterKind> for String {
    fn from(value: ParameterKind) -> Self {
        value.to_string()
    }
}

/// The shape of one automation cycle.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Eq,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AutomationPattern {
    /// Triangle: rises to the maximum at mid-cycle, then falls back.
    Linear,
    /// Triangle eased through a square law.
    Exponential,
    /// Smooth sinusoid, starting at the midpoint.
    #[default]
    Sine,
    /// Four reproducible pseudorandom steps per cycle.
    Random,
}
impl From<AutomationPattern> for String {
    fn from(value: AutomationPattern) -> Self {
        value.to_string()
    }
}

/// Describes how an automated parameter oscillates. A valid config has
/// `min_value < max_value` and a positive `speed`. Construct one with
/// [AutomationConfigBuilder], which enforces both. Deserialization goes
/// through [ConfigDraft] and is validated the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "kebab-case", try_from = "ConfigDraft")]
#[builder(build_fn(private, name = "build_from_builder"))]
pub struct AutomationConfig {
    /// The waveform.
    #[builder(default)]
    pub(crate) pattern: AutomationPattern,
    /// The bottom of the oscillation.
    pub(crate) min_value: f64,
    /// The top of the oscillation.
    pub(crate) max_value: f64,
    /// Cycles per minute.
    pub(crate) speed: f64,
    /// Where in the cycle time zero lands, 0..=1.
    #[builder(default)]
    pub(crate) phase: f64,
}
impl AutomationConfigBuilder {
    /// Builds the config, rejecting it if it couldn't drive automation.
    pub fn build(&self) -> Result<AutomationConfig, AutomationConfigBuilderError> {
        let config = self.build_from_builder()?;
        validate_config(&ConfigDraft::from(&config))
            .map_err(|e| AutomationConfigBuilderError::ValidationError(e.to_string()))?;
        Ok(config)
    }
}
#[allow(missing_docs)]
impl AutomationConfig {
    /// The cycles-per-minute rate that new parameters start with.
    pub const DEFAULT_SPEED: f64 = 30.0;

    /// The config a freshly added parameter gets: a sine wave swinging half the
    /// starting value in either direction, twice a minute. A starting value
    /// of zero has no such swing, so it gets a unit range instead. The far
    /// bound saturates at the largest finite `f64`.
    pub fn default_for(value: f64) -> Self {
        let (min_value, max_value) = if value > 0.0 {
            (value * 0.5, (value * 1.5).min(f64::MAX))
        } else if value < 0.0 {
            ((value * 1.5).max(f64::MIN), value * 0.5)
        } else {
            (0.0, 1.0)
        };
        Self {
            pattern: AutomationPattern::Sine,
            min_value,
            max_value,
            speed: Self::DEFAULT_SPEED,
            phase: 0.0,
        }
    }

    /// For testing/prototyping.
    pub fn random(rng: &mut Rng) -> Self {
        let patterns = [
            AutomationPattern::Linear,
            AutomationPattern::Exponential,
            AutomationPattern::Sine,
            AutomationPattern::Random,
        ];
        let min_value = rng.rand_f64_in(-1000.0, 1000.0);
        Self {
            pattern: patterns[rng.rand_range(0..patterns.len() as u64) as usize],
            min_value,
            max_value: min_value + rng.rand_f64_in(0.001, 1000.0),
            speed: rng.rand_f64_in(0.1, 600.0),
            phase: rng.rand_float(),
        }
    }

    pub fn pattern(&self) -> AutomationPattern {
        self.pattern
    }
    pub fn min_value(&self) -> f64 {
        self.min_value
    }
    pub fn max_value(&self) -> f64 {
        self.max_value
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// How long one full cycle takes.
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.speed)
    }
}

/// A control value that can be set by hand or driven by automation.
///
/// Build one with [AutomationParameter::try_from()] on a [ParameterDraft],
/// which validates it. Deserialization takes the same path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "ParameterDraft")]
pub struct AutomationParameter {
    pub(crate) uid: ParamUid,
    pub(crate) name: String,
    pub(crate) value: f64,
    #[serde(rename = "type")]
    pub(crate) kind: ParameterKind,
    pub(crate) automation_enabled: bool,
    pub(crate) automation_config: Option<AutomationConfig>,
}
#[allow(missing_docs)]
impl AutomationParameter {
    pub fn uid(&self) -> ParamUid {
        self.uid
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn value(&self) -> f64 {
        self.value
    }
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
    pub fn automation_enabled(&self) -> bool {
        self.automation_enabled
    }
    pub fn automation_config(&self) -> Option<&AutomationConfig> {
        self.automation_config.as_ref()
    }

    /// Whether the scheduler should be driving this parameter. Enabling
    /// automation without a config is allowed but does nothing.
    pub fn is_actively_automated(&self) -> bool {
        self.automation_enabled && self.automation_config.is_some()
    }

    /// The value this parameter would have at `elapsed`, or its current value
    /// if it isn't actively automated.
    pub fn automated_value(&self, elapsed: Duration) -> f64 {
        match (self.automation_enabled, &self.automation_config) {
            (true, Some(config)) => {
                let value = config.evaluate(elapsed);
                if value.is_finite() {
                    value
                } else {
                    self.value
                }
            }
            _ => self.value,
        }
    }

    /// A copy of this parameter holding a new value. Used by the scheduler,
    /// whose values are in range by construction.
    pub(crate) fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }
}
impl TryFrom<ParameterDraft> for AutomationParameter {
    type Error = ValidationError;

    fn try_from(draft: ParameterDraft) -> Result<Self, Self::Error> {
        validate_parameter(&draft)?;
        let automation_config = match draft.automation_config {
            Some(config) => Some(AutomationConfig::try_from(config)?),
            None => None,
        };

        // validate_parameter() has vouched for every field, so the fallbacks
        // below are never taken.
        let kind = draft
            .kind
            .as_deref()
            .and_then(|k| k.parse().ok())
            .ok_or(ValidationError::MissingKind)?;
        Ok(Self {
            uid: draft.uid.ok_or(ValidationError::MissingId)?,
            name: draft.name.ok_or(ValidationError::MissingName)?,
            value: draft.value.ok_or(ValidationError::InvalidValue)?,
            kind,
            automation_enabled: draft.automation_enabled,
            automation_config,
        })
    }
}

/// A parameter as submitted from outside, before validation. Every field that
/// validation checks is optional so that every kind of bad input can be
/// expressed (and rejected).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ParameterDraft {
    /// Assigned by the engine when the draft is added.
    #[builder(setter(strip_option))]
    pub uid: Option<ParamUid>,
    /// Display label. Must not be blank.
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,
    /// Starting value. Must be finite.
    #[builder(setter(strip_option))]
    pub value: Option<f64>,
    /// A [ParameterKind] wire name, such as "BPM".
    #[serde(rename = "type")]
    #[builder(setter(into, strip_option))]
    pub kind: Option<String>,
    /// Whether the scheduler should drive this parameter.
    #[serde(default)]
    pub automation_enabled: bool,
    /// How the scheduler should drive it.
    #[builder(setter(into, strip_option))]
    pub automation_config: Option<ConfigDraft>,
}
impl ParameterDraft {
    /// A draft of the sort the add-parameter form produces: automation off,
    /// with [AutomationConfig::default_for()] attached.
    pub fn new_with(name: &str, value: f64, kind: ParameterKind) -> Self {
        Self {
            uid: None,
            name: Some(name.to_string()),
            value: Some(value),
            kind: Some(kind.into()),
            automation_enabled: false,
            automation_config: Some(AutomationConfig::default_for(value).into()),
        }
    }
}
impl From<&AutomationParameter> for ParameterDraft {
    fn from(param: &AutomationParameter) -> Self {
        Self {
            uid: Some(param.uid),
            name: Some(param.name.clone()),
            value: Some(param.value),
            kind: Some(param.kind.into()),
            automation_enabled: param.automation_enabled,
            automation_config: param.automation_config.as_ref().map(ConfigDraft::from),
        }
    }
}

/// An [AutomationConfig] before validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ConfigDraft {
    /// An [AutomationPattern] wire name, such as "sine".
    #[builder(setter(into, strip_option))]
    pub pattern: Option<String>,
    /// The bottom of the oscillation.
    #[builder(setter(strip_option))]
    pub min_value: Option<f64>,
    /// The top of the oscillation. Must exceed `min_value`.
    #[builder(setter(strip_option))]
    pub max_value: Option<f64>,
    /// Cycles per minute. Must be positive.
    #[builder(setter(strip_option))]
    pub speed: Option<f64>,
    /// Starting offset within a cycle. Missing means zero.
    #[builder(setter(strip_option))]
    pub phase: Option<f64>,
}
impl From<&AutomationConfig> for ConfigDraft {
    fn from(config: &AutomationConfig) -> Self {
        Self {
            pattern: Some(config.pattern.into()),
            min_value: Some(config.min_value),
            max_value: Some(config.max_value),
            speed: Some(config.speed),
            phase: Some(config.phase),
        }
    }
}
impl From<AutomationConfig> for ConfigDraft {
    fn from(config: AutomationConfig) -> Self {
        Self::from(&config)
    }
}
impl TryFrom<ConfigDraft> for AutomationConfig {
    type Error = ValidationError;

    fn try_from(draft: ConfigDraft) -> Result<Self, Self::Error> {
        validate_config(&draft)?;
        Ok(Self {
            pattern: draft
                .pattern
                .as_deref()
                .and_then(|p| p.parse().ok())
                .ok_or(ValidationError::MissingPattern)?,
            min_value: draft.min_value.ok_or(ValidationError::InvalidMinValue)?,
            max_value: draft.max_value.ok_or(ValidationError::InvalidMaxValue)?,
            speed: draft.speed.ok_or(ValidationError::InvalidSpeed)?,
            phase: draft.phase.unwrap_or_default(),
        })
    }
}

/// A partial update to an existing parameter. Fields left as `None` keep their
/// current values. A new `automation_config` replaces the old one wholesale;
/// `Some(None)` removes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ParameterChanges {
    /// A new display label.
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,
    /// A new value.
    #[builder(setter(strip_option))]
    pub value: Option<f64>,
    /// A new [ParameterKind] wire name.
    #[serde(rename = "type")]
    #[builder(setter(into, strip_option))]
    pub kind: Option<String>,
    /// Turns automation on or off.
    #[builder(setter(strip_option))]
    pub automation_enabled: Option<bool>,
    /// Replaces (or, with `Some(None)`, removes) the automation config. In
    /// JSON, an absent field leaves the config alone and `null` removes it.
    #[builder(setter(strip_option))]
    #[serde(
        default,
        deserialize_with = "deserialize_replacement",
        skip_serializing_if = "Option::is_none"
    )]
    pub automation_config: Option<Option<ConfigDraft>>,
}

/// Only runs when the field is present, so `null` becomes `Some(None)`.
fn deserialize_replacement<'de, D>(
    deserializer: D,
) -> Result<Option<Option<ConfigDraft>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<ConfigDraft>::deserialize(deserializer).map(Some)
}
impl ParameterChanges {
    /// Produces the draft that results from applying these changes to
    /// `param`. The uid can't be changed.
    pub fn merged_onto(&self, param: &AutomationParameter) -> ParameterDraft {
        let mut draft = ParameterDraft::from(param);
        if let Some(name) = &self.name {
            draft.name = Some(name.clone());
        }
        if let Some(value) = self.value {
            draft.value = Some(value);
        }
        if let Some(kind) = &self.kind {
            draft.kind = Some(kind.clone());
        }
        if let Some(enabled) = self.automation_enabled {
            draft.automation_enabled = enabled;
        }
        if let Some(config) = &self.automation_config {
            draft.automation_config = config.clone();
        }
        draft
    }
}
