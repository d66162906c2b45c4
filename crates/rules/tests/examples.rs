//! Integration tests over the example rule files in `data/rules/examples/`.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rulebox_core::EvalConfig;
use rulebox_rules::validation::validate_path;
use rulebox_rules::{LoadErrorKind, Outcome, RuleLoader, RuleSet};

/// Resolve the examples directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn examples_dir() -> PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data/rules/examples")
}

fn example_rules() -> RuleSet {
    RuleSet::from_path(examples_dir()).expect("example rules should load")
}

#[test]
fn every_example_file_is_valid() {
    for name in ["10-greeting.json", "20-urgent.json", "30-filters.yaml"] {
        let result = validate_path(examples_dir().join(name));
        assert!(result.valid, "{name}: {:?}", result.errors);
        assert!(result.warnings.is_empty(), "{name}: {:?}", result.warnings);
    }
}

#[test]
fn directory_loads_in_file_order() {
    let rules = example_rules();
    let labels: Vec<&str> = rules.rules().iter().map(|r| r.label()).collect();
    assert_eq!(
        labels,
        vec![
            "greeting",
            "question",
            "urgent",
            "email",
            "not_spam",
            "clean",
            "invoice_header",
            "legacy",
        ]
    );
    assert!(!rules.rules()[7].is_active());
}

#[test]
fn each_rule_labels_its_proto_text() {
    let rules = example_rules();
    for rule in rules.rules().iter().filter(|r| r.is_active()) {
        let Some(text) = rule.proto_text() else {
            continue;
        };
        let labels = rules.assign_labels(text);
        assert!(
            labels.iter().any(|l| l == rule.label()),
            "rule '{}' did not label {text:?}: {labels:?}",
            rule.label()
        );
    }
}

#[test]
fn mixed_message_gets_labels_in_rule_order() {
    let rules = example_rules();
    let labels = rules.assign_labels("Hey, urgent: reply now? Mail ops@example.org, legitimate");
    assert_eq!(
        labels,
        vec!["greeting", "question", "urgent", "email", "not_spam", "clean"]
    );
}

#[test]
fn spam_vetoes_not_groups() {
    let rules = example_rules();
    let labels = rules.assign_labels("legitimate lottery, click here");
    assert!(labels.is_empty(), "got {labels:?}");
}

#[test]
fn multi_line_anchor_matches_inner_line() {
    let rules = example_rules();
    let labels = rules.assign_labels("From: billing\nSubject: Invoice 7");
    assert!(labels.contains(&"invoice_header".to_string()));
    assert!(!rules
        .assign_labels("Re: Subject: Invoice 7")
        .contains(&"invoice_header".to_string()));
}

#[test]
fn inactive_example_rule_never_fires() {
    let rules = example_rules();
    assert!(!rules.assign_labels("send me a FAX").contains(&"legacy".to_string()));
    let trace = rules
        .explain("send me a FAX")
        .into_iter()
        .find(|t| t.label == "legacy")
        .unwrap();
    assert_eq!(trace.outcome, Outcome::Inactive);
}

#[test]
fn batch_matches_scalar_for_both_modes() {
    let texts: Vec<String> = (0..500)
        .map(|i| match i % 5 {
            0 => format!("hello #{i}"),
            1 => format!("urgent {i} asap?"),
            2 => format!("write to user{i}@example.com"),
            3 => "casino bonus, click here".to_string(),
            _ => String::new(),
        })
        .collect();

    let sequential = RuleLoader::with_config(EvalConfig::sequential())
        .load_dir(examples_dir())
        .unwrap();
    let parallel = RuleLoader::with_config(EvalConfig {
        parallel: true,
        min_parallel_batch: 1,
    })
    .load_dir(examples_dir())
    .unwrap();

    let a = sequential.assign_labels_vector(&texts);
    let b = parallel.assign_labels_vector(&texts);
    assert_eq!(a, b);
    for (text, labels) in texts.iter().zip(&a) {
        assert_eq!(&sequential.assign_labels(text), labels);
    }
}

#[test]
fn label_sets_collapse_duplicates() {
    let rules = example_rules();
    let sets = rules.label_sets(&["hi hey hello?", ""]);
    let expected: BTreeSet<String> = ["clean", "greeting", "question"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(sets[0], expected);
    assert_eq!(sets[1].iter().collect::<Vec<_>>(), vec!["clean"]);
}

#[test]
fn single_file_and_json_string_agree() {
    let path = examples_dir().join("10-greeting.json");
    let from_file = RuleSet::from_path(&path).unwrap();
    let from_str = RuleSet::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(from_file.rules(), from_str.rules());
}

#[test]
fn missing_source_is_reported() {
    let err = RuleSet::from_path(examples_dir().join("missing.json")).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::SourceRead);
}
