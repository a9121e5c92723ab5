// Copyright (c) 2024 Mike Tsao

use auralis::prelude::*;

fn add_json(engine: &mut AutomationEngine, json: &str) -> Result<ParamUid, String> {
    let draft: ParameterDraft = serde_json::from_str(json).unwrap();
    engine.add(draft).map_err(|e| e.to_string())
}

// Drafts arrive from the UI as JSON, with any field possibly missing.
#[test]
fn json_drafts_are_validated_on_add() {
    let mut engine = AutomationEngine::new_with(Box::<auralis::automation::NullSink>::default());

    assert_eq!(
        add_json(&mut engine, r#"{"value": 1.0, "type": "BPM"}"#),
        Err("Name is required".to_string())
    );
    assert_eq!(
        add_json(&mut engine, r#"{"name": "Tempo", "type": "BPM"}"#),
        Err("Value must be a number".to_string())
    );
    assert_eq!(
        add_json(&mut engine, r#"{"name": "Tempo", "value": 1.0}"#),
        Err("Parameter type is required".to_string())
    );
    assert_eq!(
        add_json(
            &mut engine,
            r#"{"name": "Tempo", "value": 1.0, "type": "volume"}"#
        ),
        Err("Type must be one of: BPM, bass-intensity, visualizer-property".to_string())
    );
    assert_eq!(
        add_json(
            &mut engine,
            r#"{"name": "Tempo", "value": 1.0, "type": "BPM",
                "automation-config": {"pattern": "square", "min-value": 0.0,
                                      "max-value": 1.0, "speed": 1.0}}"#
        ),
        Err("Pattern must be one of: linear, exponential, sine, random".to_string())
    );
    assert_eq!(
        add_json(
            &mut engine,
            r#"{"name": "Tempo", "value": 1.0, "type": "BPM",
                "automation-config": {"pattern": "linear", "min-value": 0.0,
                                      "max-value": 1.0, "speed": 0.0}}"#
        ),
        Err("Speed must be a positive number".to_string())
    );
    assert!(engine.is_empty());

    let uid = add_json(
        &mut engine,
        r#"{"name": "Glow", "value": 0.2, "type": "visualizer-property",
            "automation-enabled": true,
            "automation-config": {"pattern": "random", "min-value": 0.0,
                                  "max-value": 1.0, "speed": 12.0}}"#,
    )
    .unwrap();
    let param = engine.parameter(uid).unwrap();
    assert_eq!(param.kind(), ParameterKind::VisualizerProperty);
    assert!(param.is_actively_automated());
    assert_eq!(param.automation_config().unwrap().phase(), 0.0);

    let failures = engine
        .drain_notifications()
        .into_iter()
        .filter(|n| n.is_failure())
        .count();
    assert_eq!(failures, 6);
}

// Edits also arrive as JSON. An explicit null removes the config, while an
// absent field leaves it alone.
#[test]
fn json_changes_distinguish_null_from_absent() {
    let mut engine = AutomationEngine::new_with(Box::<auralis::automation::NullSink>::default());
    let uid = add_json(
        &mut engine,
        r#"{"name": "Tempo", "value": 120.0, "type": "BPM",
            "automation-config": {"pattern": "sine", "min-value": 60.0,
                                  "max-value": 180.0, "speed": 30.0}}"#,
    )
    .unwrap();

    let rename: ParameterChanges = serde_json::from_str(r#"{"name": "Pulse"}"#).unwrap();
    assert_eq!(rename.automation_config, None);
    engine.update(uid, &rename).unwrap();
    let param = engine.parameter(uid).unwrap();
    assert_eq!(param.name(), "Pulse");
    assert!(param.automation_config().is_some());

    let removal: ParameterChanges =
        serde_json::from_str(r#"{"automation-config": null}"#).unwrap();
    assert_eq!(removal.automation_config, Some(None));
    assert_eq!(
        serde_json::to_string(&removal).unwrap(),
        r#"{"automation-config":null}"#
    );
    engine.update(uid, &removal).unwrap();
    assert!(engine.parameter(uid).unwrap().automation_config().is_none());

    let replacement: ParameterChanges = serde_json::from_str(
        r#"{"automation-config": {"pattern": "linear", "min-value": 1.0,
                                  "max-value": 2.0, "speed": 5.0}}"#,
    )
    .unwrap();
    assert!(matches!(replacement.automation_config, Some(Some(_))));
    let json = serde_json::to_string(&replacement).unwrap();
    let again: ParameterChanges = serde_json::from_str(&json).unwrap();
    assert_eq!(again, replacement);
    engine.update(uid, &replacement).unwrap();
    assert_eq!(
        engine.parameter(uid).unwrap().automation_config().unwrap().pattern(),
        AutomationPattern::Linear
    );
}

#[test]
fn huge_starting_values_get_a_usable_default_config() {
    let mut engine = AutomationEngine::new_with(Box::<auralis::automation::NullSink>::default());
    for value in [1.5e308, -1.5e308, f64::MAX] {
        let uid = engine
            .add(ParameterDraft::new_with("Huge", value, ParameterKind::VisualizerProperty))
            .unwrap();
        let config = engine.parameter(uid).unwrap().automation_config().unwrap().clone();
        assert!(config.min_value() < config.max_value());
        assert!(config.max_value().is_finite());
    }
    assert_eq!(engine.len(), 3);
}
