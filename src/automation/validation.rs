// Copyright (c) 2024 Mike Tsao

//! Validation rules for parameters and their automation configs. The checks
//! run in a fixed order and stop at the first failure, so a given bad input
//! always produces the same message.

use super::types::{AutomationPattern, ConfigDraft, ParameterDraft, ParameterKind};
use thiserror::Error;

/// The rule a parameter or config broke. The [Display](core::fmt::Display)
/// text is suitable for showing to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[allow(missing_docs)]
    #[error("ID is required")]
    MissingId,
    #[allow(missing_docs)]
    #[error("Name is required")]
    MissingName,
    #[allow(missing_docs)]
    #[error("Value must be a number")]
    InvalidValue,
    #[allow(missing_docs)]
    #[error("Parameter type is required")]
    MissingKind,
    /// Carries the rejected name.
    #[error("Type must be one of: BPM, bass-intensity, visualizer-property")]
    UnknownKind(String),
    #[allow(missing_docs)]
    #[error("Automation pattern is required")]
    MissingPattern,
    /// Carries the rejected name.
    #[error("Pattern must be one of: linear, exponential, sine, random")]
    UnknownPattern(String),
    #[allow(missing_docs)]
    #[error("Minimum value must be a number")]
    InvalidMinValue,
    #[allow(missing_docs)]
    #[error("Maximum value must be a number")]
    InvalidMaxValue,
    #[allow(missing_docs)]
    #[error("Maximum value must be greater than minimum value")]
    InvertedRange,
    #[allow(missing_docs)]
    #[error("Speed must be a positive number")]
    InvalidSpeed,
}

fn is_number(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

/// Checks, in order: id, name, value, kind presence, kind membership. Does not
/// look at the automation config; see [validate_config()].
pub fn validate_parameter(draft: &ParameterDraft) -> Result<(), ValidationError> {
    if !draft.uid.is_some_and(|uid| uid.is_assigned()) {
        return Err(ValidationError::MissingId);
    }
    if draft.name.as_deref().map_or(true, |name| name.trim().is_empty()) {
        return Err(ValidationError::MissingName);
    }
    if !is_number(draft.value) {
        return Err(ValidationError::InvalidValue);
    }
    let kind = match draft.kind.as_deref() {
        None | Some("") => return Err(ValidationError::MissingKind),
        Some(kind) => kind,
    };
    if kind.parse::<ParameterKind>().is_err() {
        return Err(ValidationError::UnknownKind(kind.to_string()));
    }
    Ok(())
}

/// Checks, in order: pattern presence, pattern membership, minimum, maximum,
/// `minimum < maximum`, and a positive speed. Phase is not checked.
pub fn validate_config(draft: &ConfigDraft) -> Result<(), ValidationError> {
    let pattern = match draft.pattern.as_deref() {
        None | Some("") => return Err(ValidationError::MissingPattern),
        Some(pattern) => pattern,
    };
    if pattern.parse::<AutomationPattern>().is_err() {
        return Err(ValidationError::UnknownPattern(pattern.to_string()));
    }
    let (Some(min_value), Some(max_value)) = (draft.min_value, draft.max_value) else {
        return Err(if is_number(draft.min_value) {
            ValidationError::InvalidMaxValue
        } else {
            ValidationError::InvalidMinValue
        });
    };
    if !min_value.is_finite() {
        return Err(ValidationError::InvalidMinValue);
    }
    if !max_value.is_finite() {
        return Err(ValidationError::InvalidMaxValue);
    }
    if min_value >= max_value {
        return Err(ValidationError::InvertedRange);
    }
    if !draft.speed.is_some_and(|speed| speed.is_finite() && speed > 0.0) {
        return Err(ValidationError::InvalidSpeed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{ConfigDraftBuilder, ParameterDraftBuilder};
    use crate::types::ParamUid;

    fn valid_draft() -> ParameterDraft {
        ParameterDraftBuilder::default()
            .uid(ParamUid(1))
            .name("Bass")
            .value(0.7)
            .kind("bass-intensity")
            .build()
            .unwrap()
    }

    fn valid_config() -> ConfigDraft {
        ConfigDraftBuilder::default()
            .pattern("sine")
            .min_value(60.0)
            .max_value(180.0)
            .speed(30.0)
            .phase(0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn valid_inputs_pass() {
        assert_eq!(validate_parameter(&valid_draft()), Ok(()));
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn each_parameter_field_fails_with_its_own_error() {
        let mut d = valid_draft();
        d.uid = None;
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingId));
        d.uid = Some(ParamUid::UNASSIGNED);
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingId));

        let mut d = valid_draft();
        d.name = Some("   ".to_string());
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingName));
        d.name = None;
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingName));

        let mut d = valid_draft();
        d.value = Some(f64::NAN);
        assert_eq!(validate_parameter(&d), Err(ValidationError::InvalidValue));
        d.value = Some(f64::INFINITY);
        assert_eq!(validate_parameter(&d), Err(ValidationError::InvalidValue));
        d.value = None;
        assert_eq!(validate_parameter(&d), Err(ValidationError::InvalidValue));

        let mut d = valid_draft();
        d.kind = None;
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingKind));

        let mut d = valid_draft();
        d.kind = Some("treble".to_string());
        assert_eq!(
            validate_parameter(&d),
            Err(ValidationError::UnknownKind("treble".to_string()))
        );
    }

    #[test]
    fn parameter_checks_run_in_order() {
        let d = ParameterDraft {
            uid: None,
            name: None,
            value: Some(f64::NAN),
            kind: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingId));

        let d = ParameterDraft {
            uid: Some(ParamUid(3)),
            ..d
        };
        assert_eq!(validate_parameter(&d), Err(ValidationError::MissingName));

        let d = ParameterDraft {
            name: Some("x".to_string()),
            ..d
        };
        assert_eq!(validate_parameter(&d), Err(ValidationError::InvalidValue));

        let d = ParameterDraft {
            value: Some(1.0),
            ..d
        };
        assert_eq!(
            validate_parameter(&d).unwrap_err().to_string(),
            "Type must be one of: BPM, bass-intensity, visualizer-property"
        );
    }

    #[test]
    fn parameter_validation_ignores_config() {
        let mut d = valid_draft();
        d.automation_config = Some(ConfigDraft::default());
        assert_eq!(validate_parameter(&d), Ok(()));
    }

    #[test]
    fn config_checks_run_in_order() {
        let c = ConfigDraft {
            pattern: None,
            min_value: Some(f64::NAN),
            max_value: Some(f64::INFINITY),
            speed: Some(0.0),
            phase: None,
        };
        assert_eq!(validate_config(&c), Err(ValidationError::MissingPattern));

        let c = ConfigDraft {
            pattern: Some("square".to_string()),
            ..c
        };
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::UnknownPattern("square".to_string()))
        );

        let c = ConfigDraft {
            pattern: Some("sine".to_string()),
            ..c
        };
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidMinValue));

        let c = ConfigDraft {
            min_value: Some(10.0),
            ..c
        };
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidMaxValue));

        let c = ConfigDraft {
            max_value: Some(5.0),
            ..c
        };
        assert_eq!(validate_config(&c), Err(ValidationError::InvertedRange));

        let c = ConfigDraft {
            max_value: Some(20.0),
            ..c
        };
        assert_eq!(
            validate_config(&c).unwrap_err().to_string(),
            "Speed must be a positive number"
        );

        let c = ConfigDraft {
            speed: Some(1.0),
            ..c
        };
        assert_eq!(validate_config(&c), Ok(()));
    }

    #[test]
    fn each_config_field_fails_with_its_own_error() {
        let mut c = valid_config();
        c.pattern = None;
        assert_eq!(validate_config(&c), Err(ValidationError::MissingPattern));
        c.pattern = Some("square".to_string());
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::UnknownPattern("square".to_string()))
        );

        let mut c = valid_config();
        c.min_value = Some(f64::NAN);
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidMinValue));
        c.min_value = None;
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidMinValue));

        let mut c = valid_config();
        c.max_value = None;
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidMaxValue));

        let mut c = valid_config();
        c.min_value = Some(10.0);
        c.max_value = Some(5.0);
        assert_eq!(validate_config(&c), Err(ValidationError::InvertedRange));
        c.max_value = Some(10.0);
        assert_eq!(
            validate_config(&c),
            Err(ValidationError::InvertedRange),
            "equal bounds aren't a range"
        );

        let mut c = valid_config();
        c.speed = Some(0.0);
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidSpeed));
        c.speed = Some(-3.0);
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidSpeed));
        c.speed = None;
        assert_eq!(validate_config(&c), Err(ValidationError::InvalidSpeed));
    }

    #[test]
    fn phase_outside_unit_range_is_tolerated() {
        let mut c = valid_config();
        c.phase = Some(3.5);
        assert_eq!(validate_config(&c), Ok(()));
        c.phase = None;
        assert_eq!(validate_config(&c), Ok(()));
    }
}
