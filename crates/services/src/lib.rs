// Copyright (c) 2024 Mike Tsao

//! Runs the auralis automation engine on a dedicated thread and talks to it
//! with crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AutomationService, AutomationServiceEvent, AutomationServiceInput, ProvidesService,
    };
}

pub use automation::{AutomationService, AutomationServiceEvent, AutomationServiceInput};
pub use traits::ProvidesService;

mod automation;
mod traits;
