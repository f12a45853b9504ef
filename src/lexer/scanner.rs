use std::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::{
    config::{EncodingPolicy, ScanConfig},
    errors::errors::{ScanError, ScanErrorKind},
    lexer::{
        position::PositionTracker,
        tokens::{ScanEvent, TokenKind},
    },
    pattern::match_at_with,
    rules::{Rule, RuleTable},
    Position, Span, MK_TOKEN,
};

/// Phase of the scanner after its most recent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for the next match; also the state before the first step.
    Scanning,
    /// The last step produced a token from a rule.
    Emitting,
    /// The last step skipped input no rule accepted.
    Recovering,
    /// The stream is finished.
    Done,
}

/// What sits under the cursor.
enum Unit<'src> {
    /// Decodable text and the cursor's offset inside it.
    Text(&'src str, usize),
    /// A malformed UTF-8 sequence of this many bytes.
    Invalid(usize),
}

/// Single-pass scanner over one input.
///
/// Each call to `next` performs exactly one step: it emits one token, records
/// one error, or closes the stream with an end-of-input token. Nothing is
/// scanned ahead of the consumer, so dropping the scanner early abandons the
/// rest of the input without further work.
///
/// At every offset the longest non-empty match wins. Equal lengths go to the
/// rule with the higher priority and then to the one declared first. When no
/// rule matches, one scalar value is skipped and reported as
/// [`ScanErrorKind::UnrecognizedCharacter`].
pub struct Scanner<'t, 'src> {
    table: &'t RuleTable,
    tracker: PositionTracker,
    encoding: EncodingPolicy,
    bytes: &'src [u8],
    // Longest decodable run of input starting at `run_start`.
    run: &'src str,
    run_start: usize,
    cursor: Position,
    state: ScanState,
    tokens_emitted: usize,
    errors_recorded: usize,
}

impl<'t, 'src> Scanner<'t, 'src> {
    pub fn new(table: &'t RuleTable, input: &'src str) -> Self {
        Scanner::with_config(table, input, &ScanConfig::default())
    }

    pub fn with_config(table: &'t RuleTable, input: &'src str, config: &ScanConfig) -> Self {
        let mut scanner = Scanner::from_bytes(table, input.as_bytes(), config);
        scanner.run = input;
        scanner
    }

    /// Scans raw bytes, reporting malformed UTF-8 according to
    /// `config.encoding`.
    pub fn from_bytes(table: &'t RuleTable, input: &'src [u8], config: &ScanConfig) -> Self {
        debug!(
            target: "rulelex::scanner",
            bytes = input.len(),
            rules = table.len(),
            "Creating scanner"
        );

        Scanner {
            table,
            tracker: PositionTracker::new(&config.line_terminators),
            encoding: config.encoding,
            bytes: input,
            run: "",
            run_start: 0,
            cursor: Position::start(),
            state: ScanState::Scanning,
            tokens_emitted: 0,
            errors_recorded: 0,
        }
    }

    /// Where the next step starts.
    pub fn position(&self) -> Position {
        self.cursor
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Tokens produced so far, skippable and end-of-input tokens included.
    pub fn tokens_emitted(&self) -> usize {
        self.tokens_emitted
    }

    pub fn errors_recorded(&self) -> usize {
        self.errors_recorded
    }

    fn at_eof(&self) -> bool {
        self.cursor.offset >= self.bytes.len()
    }

    fn current_unit(&mut self) -> Unit<'src> {
        let offset = self.cursor.offset;

        if offset >= self.run_start + self.run.len() {
            let rest = &self.bytes[offset..];
            let (valid, invalid) = match std::str::from_utf8(rest) {
                Ok(_) => (rest.len(), 0),
                Err(error) => (
                    error.valid_up_to(),
                    error.error_len().unwrap_or(rest.len() - error.valid_up_to()),
                ),
            };

            if valid == 0 {
                return Unit::Invalid(invalid);
            }

            self.run = std::str::from_utf8(&rest[..valid]).unwrap_or_default();
            self.run_start = offset;
        }

        Unit::Text(self.run, offset - self.run_start)
    }

    fn best_match(&self, text: &str, offset: usize) -> Option<(&'t Rule, usize)> {
        let mut best: Option<(&'t Rule, usize)> = None;

        for rule in self.table.lookup_candidates(text, offset) {
            let Some(len) = match_at_with(rule.pattern(), text, offset, &self.tracker) else {
                continue;
            };
            // An empty match cannot move the cursor.
            if len == 0 {
                continue;
            }

            let better = match best {
                None => true,
                Some((current, current_len)) => {
                    len > current_len || (len == current_len && rule.outranks(current))
                }
            };
            if better {
                best = Some((rule, len));
            }
        }

        best
    }

    fn emit(&mut self, rule: &Rule, lexeme: &'src str) -> ScanEvent<'src> {
        let start = self.cursor;
        let end = self.tracker.advance(self.bytes, start, lexeme);

        trace!(
            target: "rulelex::scanner",
            rule = rule.id(),
            offset = start.offset,
            len = lexeme.len(),
            "Matched rule"
        );

        self.cursor = end;
        self.tokens_emitted += 1;
        self.state = ScanState::Emitting;

        ScanEvent::Token(MK_TOKEN!(
            TokenKind::Rule(rule.shared_kind()),
            lexeme,
            Span::new(start.offset, end.offset),
            start,
            rule.is_skip()
        ))
    }

    fn recover(&mut self, kind: ScanErrorKind, consumed: &str, len: usize) -> ScanEvent<'src> {
        let start = self.cursor;
        let end = match kind {
            ScanErrorKind::UnrecognizedCharacter => self.tracker.advance(self.bytes, start, consumed),
            ScanErrorKind::InvalidEncoding => self.tracker.advance_unit(start, len),
        };
        let error = ScanError::new(kind, start, Span::new(start.offset, end.offset), consumed);

        warn!(
            target: "rulelex::scanner",
            line = start.line,
            column = start.column,
            "{}",
            error
        );

        self.cursor = end;
        self.errors_recorded += 1;
        self.state = match (kind, self.encoding) {
            (ScanErrorKind::InvalidEncoding, EncodingPolicy::Fatal) => ScanState::Done,
            _ => ScanState::Recovering,
        };

        ScanEvent::Error(error)
    }

    fn finish(&mut self) -> ScanEvent<'src> {
        trace!(
            target: "rulelex::scanner",
            tokens = self.tokens_emitted,
            errors = self.errors_recorded,
            "Reached end of input"
        );

        self.tokens_emitted += 1;
        self.state = ScanState::Done;

        ScanEvent::Token(MK_TOKEN!(
            TokenKind::EndOfInput,
            "",
            Span::new(self.cursor.offset, self.cursor.offset),
            self.cursor,
            false
        ))
    }

    fn step(&mut self) -> Option<ScanEvent<'src>> {
        if self.state == ScanState::Done {
            return None;
        }
        self.state = ScanState::Scanning;

        if self.at_eof() {
            return Some(self.finish());
        }

        let before = self.cursor.offset;
        let event = match self.current_unit() {
            Unit::Invalid(len) => self.recover(ScanErrorKind::InvalidEncoding, "\u{FFFD}", len),
            Unit::Text(text, offset) => match self.best_match(text, offset) {
                Some((rule, len)) => self.emit(rule, &text[offset..offset + len]),
                None => {
                    let len = text[offset..].chars().next().map_or(1, char::len_utf8);
                    self.recover(
                        ScanErrorKind::UnrecognizedCharacter,
                        &text[offset..offset + len],
                        len,
                    )
                }
            },
        };
        debug_assert!(self.cursor.offset > before, "scanner made no progress");

        Some(event)
    }
}

impl<'src> Iterator for Scanner<'_, 'src> {
    type Item = ScanEvent<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

impl FusedIterator for Scanner<'_, '_> {}
