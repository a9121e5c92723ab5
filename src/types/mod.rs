// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Clock, ManualClock, Normal, ParamUid, SystemClock, Tempo};
}

pub use {
    ranges::{Normal, RangedF64},
    time::{Clock, ManualClock, SystemClock, Tempo},
    uid::{ParamUid, ParamUidFactory},
};

mod ranges;
mod time;
mod uid;
