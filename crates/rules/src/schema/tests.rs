//! Tests for schema types.

use super::*;

const GREETING_JSON: &str = r#"
[
  {
    "label": "greeting",
    "rule": {
      "or_patterns": [
        {"pattern": "\\bhello\\b", "flags": ["i"]},
        {"pattern": "\\bhi\\b", "flags": ["i"]}
      ]
    }
  },
  {"label": "question", "rule": {"and_patterns": [{"pattern": "\\?"}]}}
]
"#;

const NOT_SPAM_YAML: &str = r#"
- label: not_spam
  uuid: 0195b2a4-not-spam
  proto_text: This is a legitimate request
  rule:
    or_patterns:
      - pattern: legitimate
    not_patterns:
      - pattern: click here
        flags: [i]
      - pattern: free money
        flags: [i]
"#;

#[test]
fn deserialize_greeting_rules() {
    let rules: Vec<RuleDefinition> = serde_json::from_str(GREETING_JSON).unwrap();
    assert_eq!(rules.len(), 2);

    let greeting = &rules[0];
    assert_eq!(greeting.label, "greeting");
    assert!(greeting.active);
    assert!(greeting.uuid.is_none());
    let or = greeting.rule.or_patterns.as_ref().unwrap();
    assert_eq!(or.len(), 2);
    assert_eq!(or[0].pattern, r"\bhello\b");
    assert_eq!(or[0].flags, vec!["i"]);
    assert!(greeting.rule.and_patterns.is_none());
    assert!(greeting.rule.not_patterns.is_none());

    // flags default to empty
    let question = &rules[1];
    let and = question.rule.and_patterns.as_ref().unwrap();
    assert!(and[0].flags.is_empty());
}

#[test]
fn deserialize_yaml_with_metadata_fields() {
    let rules: Vec<RuleDefinition> = serde_yaml::from_str(NOT_SPAM_YAML).unwrap();
    let rule = &rules[0];
    assert_eq!(rule.uuid.as_deref(), Some("0195b2a4-not-spam"));
    assert_eq!(rule.proto_text.as_deref(), Some("This is a legitimate request"));
    assert_eq!(rule.rule.not_patterns.as_ref().unwrap().len(), 2);
}

#[test]
fn active_flag_can_be_disabled() {
    let json = r#"{"label": "off", "active": false, "rule": {"or_patterns": [{"pattern": "x"}]}}"#;
    let rule: RuleDefinition = serde_json::from_str(json).unwrap();
    assert!(!rule.active);
}

#[test]
fn unknown_key_in_rule_body_is_rejected() {
    let json = r#"{"label": "typo", "rule": {"or_pattern": [{"pattern": "x"}]}}"#;
    let err = serde_json::from_str::<RuleDefinition>(json).unwrap_err();
    assert!(err.to_string().contains("or_pattern"), "got: {err}");
}

#[test]
fn unknown_key_in_pattern_is_rejected() {
    let json = r#"{"label": "typo", "rule": {"or_patterns": [{"pattern": "x", "flag": ["i"]}]}}"#;
    assert!(serde_json::from_str::<RuleDefinition>(json).is_err());
}

#[test]
fn unknown_key_on_rule_object_is_ignored() {
    let json = r#"{"label": "ok", "author": "ops", "rule": {"or_patterns": [{"pattern": "x"}]}}"#;
    let rule: RuleDefinition = serde_json::from_str(json).unwrap();
    assert_eq!(rule.label, "ok");
}

#[test]
fn missing_label_is_rejected() {
    let json = r#"{"rule": {"or_patterns": [{"pattern": "x"}]}}"#;
    let err = serde_json::from_str::<RuleDefinition>(json).unwrap_err();
    assert!(err.to_string().contains("label"), "got: {err}");
}

#[test]
fn wrong_field_type_is_rejected() {
    let json = r#"{"label": "bad", "rule": {"or_patterns": {"pattern": "x"}}}"#;
    assert!(serde_json::from_str::<RuleDefinition>(json).is_err());

    let json = r#"{"label": 42, "rule": {}}"#;
    assert!(serde_json::from_str::<RuleDefinition>(json).is_err());
}

#[test]
fn serialization_omits_absent_fields() {
    let rule = RuleDefinition::new(
        "greeting",
        ConditionDefinition::any_of([PatternDefinition::ci(r"\bhello\b")]),
    );
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "label": "greeting",
            "active": true,
            "rule": {"or_patterns": [{"pattern": "\\bhello\\b", "flags": ["i"]}]}
        })
    );
}

#[test]
fn builders_compose_groups() {
    let body = ConditionDefinition::any_of([PatternDefinition::new("legitimate")])
        .with_not([PatternDefinition::ci("click here")]);
    assert!(body.or_patterns.is_some());
    assert!(body.and_patterns.is_none());
    assert_eq!(body.not_patterns.as_ref().unwrap()[0].flags, vec!["i"]);
    assert!(!body.is_empty());
    assert!(ConditionDefinition::default().is_empty());
}

#[test]
fn null_group_is_rejected_but_missing_group_is_none() {
    let json = r#"{"label": "x", "rule": {"or_patterns": null}}"#;
    let err = serde_json::from_str::<RuleDefinition>(json).unwrap_err();
    assert!(err.to_string().contains("null"), "got: {err}");

    let rule: RuleDefinition = serde_json::from_str(r#"{"label": "x", "rule": {}}"#).unwrap();
    assert!(rule.rule.is_empty());
}
