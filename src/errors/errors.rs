use std::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use crate::pattern::PatternError;
use crate::{Position, Span};

/// A recoverable problem found while scanning.
///
/// Scan errors travel through the token stream as values; they never stop
/// the scan on their own.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind} {context:?} at {}:{}", .position.line, .position.column)]
pub struct ScanError {
    kind: ScanErrorKind,
    position: Position,
    span: Span,
    context: String,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, position: Position, span: Span, context: &str) -> Self {
        ScanError {
            kind,
            position,
            span,
            context: String::from(context),
        }
    }

    pub fn kind(&self) -> ScanErrorKind {
        self.kind
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    /// Bytes of input the error covers.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The offending text, or U+FFFD for undecodable bytes.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            ScanErrorKind::UnrecognizedCharacter => "UnrecognizedCharacter",
            ScanErrorKind::InvalidEncoding => "InvalidEncoding",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            ScanErrorKind::UnrecognizedCharacter => {
                ErrorTip::Suggestion(format!("No rule matches `{}`", self.context))
            }
            ScanErrorKind::InvalidEncoding => ErrorTip::Suggestion(format!(
                "{} byte(s) are not valid UTF-8",
                self.span.len()
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScanErrorKind {
    #[error("unrecognized character")]
    UnrecognizedCharacter,
    #[error("invalid UTF-8 sequence")]
    InvalidEncoding,
}

/// Why a rule table could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRuleError {
    #[error("rule {rule:?} has an invalid pattern: {source}")]
    Pattern { rule: String, source: PatternError },
    #[error("rule {rule:?} is declared more than once")]
    DuplicateId { rule: String },
    #[error("rule #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("rule {rule:?} has an empty token kind")]
    EmptyKind { rule: String },
}

impl InvalidRuleError {
    pub fn get_error_name(&self) -> &str {
        match self {
            InvalidRuleError::Pattern { .. } => "InvalidPattern",
            InvalidRuleError::DuplicateId { .. } => "DuplicateId",
            InvalidRuleError::EmptyId { .. } => "EmptyId",
            InvalidRuleError::EmptyKind { .. } => "EmptyKind",
        }
    }
}
