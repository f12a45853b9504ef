//! Unit tests for rule declarations and the rule table.

use super::{PatternSource, RuleFile, RuleSpec, RuleTable};
use crate::{
    config::EncodingPolicy,
    errors::errors::InvalidRuleError,
    pattern::{ClassRange, Pattern, PatternErrorKind},
    MK_RULE,
};

fn candidate_ids<'t>(table: &'t RuleTable, input: &str, offset: usize) -> Vec<&'t str> {
    table.lookup_candidates(input, offset).map(|rule| rule.id()).collect()
}

#[test]
fn test_build_keeps_declaration_order() {
    let table = RuleTable::build(vec![
        MK_RULE!("if", "if" => "KEYWORD"),
        MK_RULE!("ident", "[a-z]+" => "IDENT"),
        MK_RULE!("ws", r"\s+" => "WHITESPACE", skip),
    ])
    .unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());

    let ids: Vec<&str> = table.rules().iter().map(|rule| rule.id()).collect();
    assert_eq!(ids, vec!["if", "ident", "ws"]);

    let indexes: Vec<usize> = table.rules().iter().map(|rule| rule.index()).collect();
    assert_eq!(indexes, vec![0, 1, 2]);

    assert!(table.get("ws").unwrap().is_skip());
    assert_eq!(table.get("ident").unwrap().kind(), "IDENT");
    assert!(table.get("missing").is_none());
}

#[test]
fn test_build_empty_table() {
    let table = RuleTable::build(vec![]).unwrap();

    assert!(table.is_empty());
    assert_eq!(candidate_ids(&table, "abc", 0), Vec::<&str>::new());
}

#[test]
fn test_duplicate_id_is_rejected() {
    let result = RuleTable::build(vec![
        MK_RULE!("word", "[a-z]+" => "WORD"),
        MK_RULE!("word", "[A-Z]+" => "UPPER"),
    ]);

    let error = result.unwrap_err();
    assert_eq!(
        error,
        InvalidRuleError::DuplicateId {
            rule: String::from("word")
        }
    );
    assert_eq!(error.get_error_name(), "DuplicateId");
}

#[test]
fn test_empty_id_and_kind_are_rejected() {
    let error = RuleTable::build(vec![MK_RULE!("a", "a" => "A"), MK_RULE!("  ", "b" => "B")]).unwrap_err();
    assert_eq!(error, InvalidRuleError::EmptyId { index: 1 });

    let error = RuleTable::build(vec![MK_RULE!("a", "a" => "")]).unwrap_err();
    assert_eq!(
        error,
        InvalidRuleError::EmptyKind {
            rule: String::from("a")
        }
    );
}

#[test]
fn test_invalid_pattern_names_the_rule() {
    let error = RuleTable::build(vec![
        MK_RULE!("ok", "a" => "A"),
        MK_RULE!("broken", "(ab" => "B"),
    ])
    .unwrap_err();

    match &error {
        InvalidRuleError::Pattern { rule, source } => {
            assert_eq!(rule, "broken");
            assert_eq!(source.kind, PatternErrorKind::UnbalancedParen);
        }
        other => panic!("Expected a pattern error, got {:?}", other),
    }
    assert_eq!(error.get_error_name(), "InvalidPattern");
    assert!(error.to_string().contains("\"broken\""));
}

#[test]
fn test_invalid_structured_pattern_is_rejected() {
    let spec = RuleSpec::structured(
        "bad",
        Pattern::Repeat {
            inner: Box::new(Pattern::literal("a")),
            min: 3,
            max: Some(1),
        },
        "BAD",
    );

    let error = RuleTable::build(vec![spec]).unwrap_err();
    assert!(matches!(error, InvalidRuleError::Pattern { .. }));
}

#[test]
fn test_lookup_candidates_prunes_by_first_character() {
    let table = RuleTable::build(vec![
        MK_RULE!("if", "if" => "KEYWORD"),
        MK_RULE!("ident", "[a-z]+" => "IDENT"),
        MK_RULE!("number", "[0-9]+" => "NUMBER"),
        MK_RULE!("any", "." => "ANY"),
        MK_RULE!("greek", "[α-ω]+" => "GREEK"),
    ])
    .unwrap();

    assert_eq!(candidate_ids(&table, "if", 0), vec!["if", "ident", "any"]);
    assert_eq!(candidate_ids(&table, "xyz", 0), vec!["ident", "any"]);
    assert_eq!(candidate_ids(&table, "a1", 1), vec!["number", "any"]);
    assert_eq!(candidate_ids(&table, "λ", 0), vec!["any", "greek"]);
    assert_eq!(candidate_ids(&table, "if", 2), Vec::<&str>::new());
}

#[test]
fn test_lookup_candidates_through_optional_prefix() {
    let table = RuleTable::build(vec![
        MK_RULE!("signed", "-?[0-9]+" => "INT"),
        MK_RULE!("anchored", "^#" => "DIRECTIVE"),
    ])
    .unwrap();

    assert_eq!(candidate_ids(&table, "-1", 0), vec!["signed"]);
    assert_eq!(candidate_ids(&table, "1", 0), vec!["signed"]);
    assert_eq!(candidate_ids(&table, "#", 0), vec!["anchored"]);
}

#[test]
fn test_outranks_uses_priority_then_order() {
    let table = RuleTable::build(vec![
        MK_RULE!("first", "a" => "A"),
        MK_RULE!("second", "a" => "A"),
        MK_RULE!("boosted", "a" => "A", priority = 5),
        MK_RULE!("lowered", "a" => "A", priority = -1),
    ])
    .unwrap();

    let first = table.get("first").unwrap();
    let second = table.get("second").unwrap();
    let boosted = table.get("boosted").unwrap();
    let lowered = table.get("lowered").unwrap();

    assert!(first.outranks(second));
    assert!(!second.outranks(first));
    assert!(boosted.outranks(first));
    assert!(first.outranks(lowered));
    assert!(!first.outranks(first));
    assert_eq!(boosted.priority(), 5);
    assert_eq!(first.priority(), 0);
}

#[test]
fn test_rule_spec_builders() {
    let spec = RuleSpec::literal("plus", "+", "PLUS").with_priority(2).skipped();

    assert_eq!(spec.pattern, PatternSource::Literal(String::from("+")));
    assert_eq!(spec.priority, Some(2));
    assert!(spec.skip);

    let table = RuleTable::build(vec![spec]).unwrap();
    assert_eq!(table.rules()[0].pattern(), &Pattern::literal("+"));
}

#[test]
fn test_build_is_repeatable() {
    let specs = vec![
        MK_RULE!("if", "if" => "KEYWORD"),
        MK_RULE!("ident", "[a-z]+" => "IDENT"),
    ];

    let a = RuleTable::build(specs.clone()).unwrap();
    let b = RuleTable::build(specs).unwrap();

    for (left, right) in a.rules().iter().zip(b.rules()) {
        assert_eq!(left.id(), right.id());
        assert_eq!(left.pattern(), right.pattern());
    }
    assert_eq!(candidate_ids(&a, "if", 0), candidate_ids(&b, "if", 0));
}

#[test]
fn test_rule_file_from_json() {
    let file = RuleFile::from_json(
        r#"{
            "rules": [
                { "id": "number", "pattern": "[0-9]+", "kind": "NUMBER" },
                { "id": "plus", "pattern": { "literal": "+" }, "kind": "PLUS", "priority": 3 },
                { "id": "dot", "pattern": { "regex": "\\." }, "kind": "DOT" },
                { "id": "ws", "pattern": { "structured": { "class": { "ranges": [[" ", " "]] } } }, "kind": "WS", "skip": true }
            ],
            "config": { "encoding": "fatal" }
        }"#,
    )
    .unwrap();

    assert_eq!(file.rules.len(), 4);
    assert_eq!(file.rules[0].pattern, PatternSource::Regex(String::from("[0-9]+")));
    assert_eq!(file.rules[1].pattern, PatternSource::Literal(String::from("+")));
    assert_eq!(file.rules[1].priority, Some(3));
    assert_eq!(file.rules[2].pattern, PatternSource::Regex(String::from(r"\.")));
    assert!(file.rules[3].skip);
    assert_eq!(file.config.encoding, EncodingPolicy::Fatal);
    assert_eq!(file.config.line_terminators, vec!["\r\n", "\n"]);

    let (table, config) = file.build().unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(config.encoding, EncodingPolicy::Fatal);
    assert_eq!(
        table.get("ws").unwrap().pattern(),
        &Pattern::class(vec![ClassRange(' ', ' ')])
    );
}

#[test]
fn test_rule_file_defaults() {
    let file = RuleFile::from_json(r#"{ "rules": [ { "id": "a", "pattern": "a", "kind": "A" } ] }"#).unwrap();

    assert_eq!(file.rules[0].priority, None);
    assert!(!file.rules[0].skip);
    assert_eq!(file.config.encoding, EncodingPolicy::Recover);
}

#[test]
fn test_rule_file_round_trips_through_json() {
    let file = RuleFile {
        rules: vec![
            RuleSpec::new("ident", "[a-z]+", "IDENT"),
            RuleSpec::literal("arrow", "->", "ARROW").with_priority(1),
        ],
        config: Default::default(),
    };

    let text = serde_json::to_string(&file).unwrap();
    assert_eq!(RuleFile::from_json(&text).unwrap(), file);
}

#[test]
fn test_rule_file_rejects_malformed_json() {
    assert!(RuleFile::from_json(r#"{ "rules": [ { "id": "a" } ] }"#).is_err());
    assert!(RuleFile::from_json("not json").is_err());
}
