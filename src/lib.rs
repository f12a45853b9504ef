#![allow(clippy::module_inception)]

//! A rule-driven lexical scanner.
//!
//! A [`RuleTable`] is built once from an ordered list of [`RuleSpec`]
//! declarations and can then be shared by any number of [`Scanner`]s, each
//! of which turns one input into a lazy stream of positioned tokens. The
//! scanner always takes the longest match; equal lengths go to the higher
//! explicit priority and then to the rule declared first. Characters no rule
//! accepts are reported as [`ScanError`]s and skipped one at a time, so a
//! single pass always yields a best-effort token stream plus every error.

use serde::Serialize;

pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod pattern;
pub mod presets;
pub mod rules;

pub use config::{EncodingPolicy, ScanConfig};
pub use errors::errors::{ErrorTip, InvalidRuleError, ScanError, ScanErrorKind};
pub use lexer::position::PositionTracker;
pub use lexer::scanner::{ScanState, Scanner};
pub use lexer::stream::{tokenize, tokenize_bytes, tokenize_with, Tokenized, Tokens};
pub use lexer::tokens::{ScanEvent, Token, TokenKind};
pub use pattern::{match_at, match_at_with, Pattern, PatternError};
pub use rules::{PatternSource, Rule, RuleFile, RuleSpec, RuleTable};

/// A point in the input: byte offset plus 1-based line and column.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

/// Half-open byte range `[start, end)` of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Finds the line holding `offset`, splitting lines at the default
/// terminators.
///
/// Returns the 1-based line number, the line text (terminator excluded) and
/// the byte offset of `offset` within that line.
pub fn get_line_at_position(source: &str, offset: usize) -> Option<(usize, String, usize)> {
    PositionTracker::default().line_containing(source.as_bytes(), offset)
}

#[cfg(test)]
mod tests {
    use crate::errors::errors::{ScanError, ScanErrorKind};
    use crate::{Position, Span};

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\n\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, 500).is_none());
    }

    #[test]
    fn test_get_line_at_end_of_input() {
        let (line_number, line, line_pos) = super::get_line_at_position("ab\ncd", 5).unwrap();
        assert_eq!(line_number, 2);
        assert_eq!(line, "cd");
        assert_eq!(line_pos, 2);
    }

    #[test]
    fn test_render_error() {
        let source = "let a = 1;\n    let b = #;\n";
        let error = ScanError::new(
            ScanErrorKind::UnrecognizedCharacter,
            Position {
                offset: 23,
                line: 2,
                column: 13,
            },
            Span::new(23, 24),
            "#",
        );

        let rendered = super::render_error(source, "final.lang", &error);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UnrecognizedCharacter (No rule matches `#`)");
        assert_eq!(lines[1], "-> final.lang:2:13");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | let b = #;");
        assert_eq!(lines[4], "  | --------^");
    }
}

/// Renders a caret-underlined snippet pointing at `error` in `source`.
///
/// ```text
/// Error: UnrecognizedCharacter (No rule matches `#`)
/// -> final.lang:20:9
///    |
/// 20 | let a = #;
///    | --------^
/// ```
pub fn render_error<S>(source: &S, name: &str, error: &ScanError) -> String
where
    S: AsRef<[u8]> + ?Sized,
{
    render_error_with(source, name, error, &ScanConfig::default())
}

/// Like [`render_error`] for a scan that ran with `config`.
///
/// `source` is the scanned input as given to the scanner, bytes included,
/// so offsets past malformed sequences still land on the right line.
pub fn render_error_with<S>(source: &S, name: &str, error: &ScanError, config: &ScanConfig) -> String
where
    S: AsRef<[u8]> + ?Sized,
{
    let position = error.get_position();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!(
        "-> {}:{}:{}\n",
        name, position.line, position.column
    ));

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let line_text = PositionTracker::new(&config.line_terminators)
        .line_containing(source.as_ref(), position.offset)
        .map(|(_, text, _)| text)
        .unwrap_or_default();
    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!(
        "{} | {}\n",
        line_string,
        line_text_removed.trim_end()
    ));

    let arrows = position.column.saturating_sub(removed_whitespace).max(1);
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
