//! Consumer-facing views of the scanner.
//!
//! [`Scanner`] itself is the raw stream: every token (skippable ones
//! included), every error and the closing end-of-input token. [`Tokens`]
//! is the filtered stream a parser usually reads, with errors set aside.
//! The `tokenize*` functions drain a scan into a [`Tokenized`].

use std::iter::FusedIterator;

use crate::{
    config::{EncodingPolicy, ScanConfig},
    errors::errors::{ScanError, ScanErrorKind},
    lexer::{
        scanner::Scanner,
        tokens::{ScanEvent, Token},
    },
    rules::RuleTable,
};

/// Non-skippable tokens of a scan, errors collected on the side.
pub struct Tokens<'t, 'src> {
    scanner: Scanner<'t, 'src>,
    errors: Vec<ScanError>,
}

impl<'t, 'src> Tokens<'t, 'src> {
    /// Errors met so far.
    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ScanError> {
        self.errors
    }

    pub fn scanner(&self) -> &Scanner<'t, 'src> {
        &self.scanner
    }
}

impl<'src> Iterator for Tokens<'_, 'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.scanner.next()? {
                ScanEvent::Token(token) if token.skippable => continue,
                ScanEvent::Token(token) => return Some(token),
                ScanEvent::Error(error) => self.errors.push(error),
            }
        }
    }
}

impl FusedIterator for Tokens<'_, '_> {}

impl<'t, 'src> Scanner<'t, 'src> {
    /// The filtered stream over this scanner.
    pub fn tokens(self) -> Tokens<'t, 'src> {
        Tokens {
            scanner: self,
            errors: vec![],
        }
    }
}

/// A fully drained scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized<'src> {
    /// Non-skippable tokens, ending with the end-of-input token.
    pub tokens: Vec<Token<'src>>,
    pub errors: Vec<ScanError>,
}

impl<'src> Tokenized<'src> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Token kind names, in order.
    pub fn kinds(&self) -> Vec<&str> {
        self.tokens.iter().map(|token| token.kind.name()).collect()
    }

    /// Token lexemes, in order.
    pub fn lexemes(&self) -> Vec<&'src str> {
        self.tokens.iter().map(|token| token.lexeme).collect()
    }
}

fn drain<'src>(scanner: Scanner<'_, 'src>) -> Tokenized<'src> {
    let mut tokens = scanner.tokens();
    let collected: Vec<Token<'src>> = tokens.by_ref().collect();

    Tokenized {
        tokens: collected,
        errors: tokens.into_errors(),
    }
}

pub fn tokenize<'src>(table: &RuleTable, source: &'src str) -> Tokenized<'src> {
    drain(Scanner::new(table, source))
}

pub fn tokenize_with<'src>(table: &RuleTable, source: &'src str, config: &ScanConfig) -> Tokenized<'src> {
    drain(Scanner::with_config(table, source, config))
}

/// Scans bytes that may not be valid UTF-8.
///
/// With [`EncodingPolicy::Fatal`] the first malformed sequence is returned
/// as the error; otherwise it is recorded like any other scan error.
pub fn tokenize_bytes<'src>(
    table: &RuleTable,
    source: &'src [u8],
    config: &ScanConfig,
) -> Result<Tokenized<'src>, ScanError> {
    let tokenized = drain(Scanner::from_bytes(table, source, config));

    if config.encoding == EncodingPolicy::Fatal {
        if let Some(error) = tokenized
            .errors
            .iter()
            .find(|error| error.kind() == ScanErrorKind::InvalidEncoding)
        {
            return Err(error.clone());
        }
    }

    Ok(tokenized)
}
