// Copyright (c) 2024 Mike Tsao

use super::{ParameterKind, ValidationError};
use crate::types::ParamUid;
use thiserror::Error;

/// Why an engine operation didn't happen.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The parameter (or the result of the requested change) broke a rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No parameter has that uid.
    #[error("No parameter with ID {0}")]
    NotFound(ParamUid),

    /// The sink refused a value.
    #[error("Couldn't deliver {value} to {kind} for parameter {uid}: {source}")]
    SinkDelivery {
        #[allow(missing_docs)]
        uid: ParamUid,
        #[allow(missing_docs)]
        kind: ParameterKind,
        #[allow(missing_docs)]
        value: f64,
        #[allow(missing_docs)]
        #[source]
        source: anyhow::Error,
    },
}
impl AutomationError {
    /// The validation failure, if that's what this is.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            AutomationError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
