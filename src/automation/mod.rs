// Copyright (c) 2024 Mike Tsao

//! Changes parameters over time in a programmatic, reproducible way.
//!
//! Suppose a performer wants the tempo to drift between 60 and 180 BPM
//! throughout a session. Turning a knob back and forth by hand would work,
//! but it's tedious and never comes out the same twice. Instead, attach an
//! [AutomationConfig] to the tempo [AutomationParameter] and enable it. While
//! automation is enabled, the [AutomationScheduler] evaluates the config once
//! per frame and pushes the result through an [AutomationSink] to whatever
//! actually plays the music.
//!
//! Every value that reaches the [AutomationEngine] arrives as a
//! [ParameterDraft] (or, for edits, a [ParameterChanges]) and is validated
//! before anything is stored. The result of each mutation is reported as a
//! [Notification].
//!
//! Waveform evaluation is a pure function of the config and the elapsed time,
//! so the same config at the same instant always yields the same value. Time
//! comes from a [Clock](crate::types::Clock), never from counting frames.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AutomationConfig, AutomationEngine, AutomationError, AutomationParameter,
        AutomationPattern, AutomationScheduler, AutomationSink, ConfigDraft, Notification,
        ParameterChanges, ParameterDraft, ParameterKind, ValidationError,
    };
}

pub use engine::AutomationEngine;
pub use error::AutomationError;
pub use notification::{Notification, NotificationKind, NotificationOutcome};
pub use scheduler::{AutomationScheduler, TickReport};
pub use sinks::{NullSink, RecordingSink, SinkCall};
pub use traits::AutomationSink;
pub use types::{
    AutomationConfig, AutomationConfigBuilder, AutomationConfigBuilderError, AutomationParameter,
    AutomationPattern, ConfigDraft, ConfigDraftBuilder, ParameterChanges,
    ParameterChangesBuilder, ParameterDraft, ParameterDraftBuilder, ParameterKind,
};
pub use validation::{validate_config, validate_parameter, ValidationError};

mod engine;
mod error;
mod notification;
mod scheduler;
mod sinks;
mod traits;
mod types;
mod validation;
mod waveform;
