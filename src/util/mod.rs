// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{AudioVisualSettings, AutomationSettings, CrossbeamChannel, JsonSettings, Rng};
}

pub use channels::CrossbeamChannel;
pub use rng::Rng;
pub use settings::{AudioVisualSettings, AutomationSettings, JsonSettings};

mod channels;
mod rng;
mod settings;
