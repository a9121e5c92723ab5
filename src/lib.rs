// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Auralis drives an audio-reactive visualizer. Its core is a parameter
//! automation engine: a deterministic, time-driven function generator that
//! animates control parameters such as tempo and bass intensity.
//!
//! * Describe what should move with an [AutomationParameter] and its
//! [AutomationConfig](automation::AutomationConfig), and hand it to an
//! [AutomationEngine], which validates every change before storing it.
//! * Call [AutomationScheduler::tick()] once per frame (or let
//! `auralis-services` do it on its own thread). Each tick evaluates every
//! automated parameter at the same instant and pushes the results through an
//! [AutomationSink](traits::AutomationSink).
//! * [AudioVisualHandle](audio_visual::AudioVisualHandle) is the sink that
//! ships with the crate. It holds the playback controls and the spectrum the
//! renderer draws from.

/// A collection of imports that are useful to users of this crate. `use
/// auralis::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        audio_visual::prelude::*, automation::prelude::*, traits::prelude::*,
        types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use automation::{AutomationEngine, AutomationParameter, AutomationScheduler};

pub mod audio_visual;
pub mod automation;
pub mod traits;
pub mod types;
pub mod util;
