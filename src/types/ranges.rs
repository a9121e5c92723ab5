// Copyright (c) 2024 Mike Tsao

use core::fmt::Display;
use serde::{Deserialize, Serialize};

/// [RangedF64] keeps an f64 within compile-time limits. It clamps on creation
/// and on conversion from f64. It doesn't tell you when
/// clamping happens; it just does it, silently.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;

    pub fn new(value: f64) -> Self {
        Self(Self::clamp(value))
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn minimum() -> Self {
        Self(Self::MIN)
    }

    // NaN would survive f64::clamp(), so it collapses to the lower limit.
    fn clamp(value: f64) -> f64 {
        if value.is_nan() {
            Self::MIN
        } else {
            value.clamp(Self::MIN, Self::MAX)
        }
    }
}
impl<const LOWER: i8, const UPPER: i8> Display for RangedF64<LOWER, UPPER> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}
impl<const LOWER: i8, const UPPER: i8> From<RangedF64<LOWER, UPPER>> for f64 {
    fn from(value: RangedF64<LOWER, UPPER>) -> Self {
        value.0
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// A [Normal] is a RangedF64 whose range is [0.0, 1.0]. Volumes and voice
/// intensities are Normals.
pub type Normal = RangedF64<0, 1>;
impl Default for Normal {
    fn default() -> Self {
        Self(0.0)
    }
}
