use std::{fmt::Display, sync::Arc};

use serde::{Serialize, Serializer};

use crate::{errors::errors::ScanError, Position, Span};

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum TokenKind {
    /// Produced by the rule with this token kind.
    Rule(Arc<str>),
    /// The synthetic token closing every complete stream.
    EndOfInput,
}

impl TokenKind {
    pub fn rule(name: &str) -> Self {
        TokenKind::Rule(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        match self {
            TokenKind::Rule(name) => name,
            TokenKind::EndOfInput => "EOF",
        }
    }

    pub fn is(&self, name: &str) -> bool {
        matches!(self, TokenKind::Rule(kind) if kind.as_ref() == name)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A classified span of input.
///
/// The lexeme borrows from the scanned input, so tokens cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub span: Span,
    /// Where the token starts.
    pub position: Position,
    pub skippable: bool,
}

impl Token<'_> {
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_eof() {
            write!(f, "{}:{} {}", self.line(), self.column(), self.kind)
        } else {
            write!(
                f,
                "{}:{} {} {:?}",
                self.line(),
                self.column(),
                self.kind,
                self.lexeme
            )
        }
    }
}

/// One element of the raw stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanEvent<'src> {
    Token(Token<'src>),
    Error(ScanError),
}

impl<'src> ScanEvent<'src> {
    pub fn token(&self) -> Option<&Token<'src>> {
        match self {
            ScanEvent::Token(token) => Some(token),
            ScanEvent::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ScanError> {
        match self {
            ScanEvent::Token(_) => None,
            ScanEvent::Error(error) => Some(error),
        }
    }

    /// Input bytes covered by this element.
    pub fn span(&self) -> Span {
        match self {
            ScanEvent::Token(token) => token.span,
            ScanEvent::Error(error) => error.span(),
        }
    }
}
