//! Line and column bookkeeping.
//!
//! The tracker is the one place that knows where lines break: the scanner
//! advances positions with it, `^`/`$` anchors ask it for line boundaries
//! and diagnostics use it to find the source line of an error.

use crate::Position;

/// Advances positions over consumed text.
///
/// Columns count scalar values and restart at 1 after every line
/// terminator. When several terminators could start at the same point the
/// longest one is taken, so `"\r\n"` counts once even when `"\r"` is also
/// configured. A terminator split across two lexemes counts when its last
/// byte is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTracker {
    terminators: Vec<String>,
}

impl PositionTracker {
    pub fn new(terminators: &[String]) -> Self {
        let mut terminators: Vec<String> = terminators
            .iter()
            .filter(|terminator| !terminator.is_empty())
            .cloned()
            .collect();
        terminators.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terminators.dedup();

        PositionTracker { terminators }
    }

    pub fn terminators(&self) -> &[String] {
        &self.terminators
    }

    /// The position just past `consumed`.
    ///
    /// `consumed` must be the text of `input` starting at `position.offset`;
    /// the rest of `input` is only looked at to tell whether a terminator
    /// continues past the end of `consumed`.
    pub fn advance(&self, input: &[u8], position: Position, consumed: &str) -> Position {
        let mut next = position;
        let mut rest = consumed;

        if let Some(tail) = self.unfinished_at(input, position.offset) {
            let finished = tail <= rest.len();
            let tail = tail.min(rest.len());
            if finished {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += rest[..tail].chars().count();
            }
            next.offset += tail;
            rest = &rest[tail..];
        }

        while let Some(c) = rest.chars().next() {
            let step = match self.terminator_at(&input[next.offset..]) {
                Some(len) if len <= rest.len() => {
                    next.line += 1;
                    next.column = 1;
                    len
                }
                // Finished by a later lexeme.
                Some(_) => {
                    next.column += rest.chars().count();
                    rest.len()
                }
                None => {
                    next.column += 1;
                    c.len_utf8()
                }
            };

            next.offset += step;
            rest = &rest[step..];
        }

        next
    }

    /// Advances over `len` bytes that stand for one replacement character.
    pub fn advance_unit(&self, position: Position, len: usize) -> Position {
        Position {
            offset: position.offset + len,
            line: position.line,
            column: position.column + 1,
        }
    }

    /// Whether a line begins at `offset`.
    pub fn is_line_start(&self, input: &[u8], offset: usize) -> bool {
        if offset == 0 {
            return true;
        }

        let before = &input[..offset];
        self.unfinished_at(input, offset).is_none()
            && self
                .terminators
                .iter()
                .any(|terminator| before.ends_with(terminator.as_bytes()))
    }

    /// Whether a line ends at `offset`, either at a terminator or at the end
    /// of input.
    pub fn is_line_end(&self, input: &[u8], offset: usize) -> bool {
        offset == input.len()
            || (self.unfinished_at(input, offset).is_none()
                && self.terminator_at(&input[offset..]).is_some())
    }

    /// Line number, text (without its terminator) and byte offset within the
    /// line for `offset` in `source`.
    pub fn line_containing(&self, source: &[u8], offset: usize) -> Option<(usize, String, usize)> {
        if offset > source.len() {
            return None;
        }

        let mut line = 1;
        let mut line_start = 0;
        let mut i = 0;

        while i < offset {
            match self.terminator_at(&source[i..]) {
                Some(len) => {
                    i += len;
                    if i <= offset {
                        line += 1;
                        line_start = i;
                    }
                }
                None => i += 1,
            }
        }

        let mut line_end = line_start;
        while line_end < source.len() && self.terminator_at(&source[line_end..]).is_none() {
            line_end += 1;
        }

        let text = String::from_utf8_lossy(&source[line_start..line_end]).into_owned();
        Some((line, text, offset - line_start))
    }

    fn terminator_at(&self, text: &[u8]) -> Option<usize> {
        self.terminators
            .iter()
            .find(|terminator| text.starts_with(terminator.as_bytes()))
            .map(String::len)
    }

    /// Bytes still missing from a terminator that starts before `offset` and
    /// runs past it.
    fn unfinished_at(&self, input: &[u8], offset: usize) -> Option<usize> {
        self.terminators.iter().find_map(|terminator| {
            let terminator = terminator.as_bytes();
            (1..terminator.len())
                .filter(|&back| back <= offset)
                .find(|&back| input[offset - back..].starts_with(terminator))
                .map(|back| terminator.len() - back)
        })
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        PositionTracker::new(&crate::config::DEFAULT_LINE_TERMINATORS)
    }
}
