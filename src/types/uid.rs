// Copyright (c) 2024 Mike Tsao

//! Unique identifiers for automation parameters, and the factory that ensures
//! they are in fact unique.

use core::sync::atomic::{AtomicUsize, Ordering};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Identifies an automation parameter for its whole lifetime. The zero value
/// is reserved to mean "not yet assigned."
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
// See
// https://doc.rust-lang.org/stable/std/marker/trait.StructuralPartialEq.html
// for explanation why we derive PartialEq rather than letting Synonym do it.
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct ParamUid(pub usize);
impl ParamUid {
    /// The placeholder for a parameter that hasn't been minted a uid.
    pub const UNASSIGNED: ParamUid = ParamUid(0);

    /// Whether a factory minted this uid.
    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

/// Generates unique [ParamUid]s. Uniqueness holds for the life of the factory,
/// which in practice is the life of the owning engine.
#[derive(Debug)]
pub struct ParamUidFactory {
    next_uid_value: AtomicUsize,
}
impl Default for ParamUidFactory {
    fn default() -> Self {
        Self::new(1)
    }
}
impl ParamUidFactory {
    /// Creates a new [ParamUidFactory] starting with the given value. A zero
    /// start is bumped to one so that [ParamUid::UNASSIGNED] is never minted.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid.max(1)),
        }
    }

    /// Generates the next unique uid.
    pub fn mint_next(&self) -> ParamUid {
        ParamUid(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }
}
