//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{ErrorTip, InvalidRuleError, ScanError, ScanErrorKind};
use crate::pattern::parse;
use crate::{Position, Span};

fn position(offset: usize, line: usize, column: usize) -> Position {
    Position {
        offset,
        line,
        column,
    }
}

#[test]
fn test_error_creation() {
    let error = ScanError::new(
        ScanErrorKind::UnrecognizedCharacter,
        position(10, 1, 11),
        Span::new(10, 11),
        "@",
    );

    assert_eq!(error.get_error_name(), "UnrecognizedCharacter");
    assert_eq!(error.kind(), ScanErrorKind::UnrecognizedCharacter);
    assert_eq!(error.context(), "@");
}

#[test]
fn test_error_position() {
    let error = ScanError::new(
        ScanErrorKind::UnrecognizedCharacter,
        position(42, 3, 7),
        Span::new(42, 43),
        "#",
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().line, 3);
    assert_eq!(error.get_position().column, 7);
    assert_eq!(error.span(), Span::new(42, 43));
}

#[test]
fn test_invalid_encoding_error() {
    let error = ScanError::new(
        ScanErrorKind::InvalidEncoding,
        position(0, 1, 1),
        Span::new(0, 2),
        "\u{FFFD}",
    );

    assert_eq!(error.get_error_name(), "InvalidEncoding");
    assert_eq!(error.get_tip().to_string(), "2 byte(s) are not valid UTF-8");
}

#[test]
fn test_error_display() {
    let error = ScanError::new(
        ScanErrorKind::UnrecognizedCharacter,
        position(4, 2, 3),
        Span::new(4, 5),
        "@",
    );

    assert_eq!(error.to_string(), "unrecognized character \"@\" at 2:3");
}

#[test]
fn test_error_tip_suggestion() {
    let error = ScanError::new(
        ScanErrorKind::UnrecognizedCharacter,
        position(0, 1, 1),
        Span::new(0, 1),
        "}",
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "No rule matches `}`"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_invalid_rule_error_names() {
    let pattern_error = parse("(").unwrap_err();
    let errors = [
        (
            InvalidRuleError::Pattern {
                rule: "group".to_string(),
                source: pattern_error,
            },
            "InvalidPattern",
        ),
        (
            InvalidRuleError::DuplicateId {
                rule: "ident".to_string(),
            },
            "DuplicateId",
        ),
        (InvalidRuleError::EmptyId { index: 3 }, "EmptyId"),
        (
            InvalidRuleError::EmptyKind {
                rule: "ident".to_string(),
            },
            "EmptyKind",
        ),
    ];

    for (error, name) in errors {
        assert_eq!(error.get_error_name(), name);
    }
}

#[test]
fn test_invalid_rule_error_display() {
    let error = InvalidRuleError::Pattern {
        rule: "number".to_string(),
        source: parse("[0-9").unwrap_err(),
    };

    assert_eq!(
        error.to_string(),
        "rule \"number\" has an invalid pattern: unterminated character class at offset 0"
    );

    let error = InvalidRuleError::DuplicateId {
        rule: "ident".to_string(),
    };
    assert_eq!(error.to_string(), "rule \"ident\" is declared more than once");
}
