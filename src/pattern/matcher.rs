use std::collections::BTreeSet;

use lazy_static::lazy_static;

use super::ast::{Anchor, Pattern};
use crate::lexer::position::PositionTracker;

lazy_static! {
    static ref DEFAULT_LINES: PositionTracker = PositionTracker::default();
}

/// Length of the longest match of `pattern` in `input` starting at `offset`.
///
/// Every way the pattern can match is explored and the furthest end wins, so
/// `a|ab` on `"ab"` yields 2. `Some(0)` means only the empty string matched.
/// Offsets past the end or inside a multi-byte scalar never match.
///
/// Anchors use the default line terminators; see [`match_at_with`].
pub fn match_at(pattern: &Pattern, input: &str, offset: usize) -> Option<usize> {
    match_at_with(pattern, input, offset, &DEFAULT_LINES)
}

/// Like [`match_at`], with `^` and `$` placed by the terminators of `lines`.
pub fn match_at_with(
    pattern: &Pattern,
    input: &str,
    offset: usize,
    lines: &PositionTracker,
) -> Option<usize> {
    if offset > input.len() || !input.is_char_boundary(offset) {
        return None;
    }

    let matcher = Matcher { input, lines };
    matcher.ends(pattern, &[offset]).last().map(|end| end - offset)
}

struct Matcher<'a> {
    input: &'a str,
    lines: &'a PositionTracker,
}

impl Matcher<'_> {
    /// Maps a sorted set of start offsets to the sorted set of reachable ends.
    fn ends(&self, pattern: &Pattern, starts: &[usize]) -> Vec<usize> {
        let input = self.input;

        let mut out = match pattern {
            Pattern::Literal(text) => starts
                .iter()
                .filter(|&&start| input[start..].starts_with(text.as_str()))
                .map(|start| start + text.len())
                .collect(),
            Pattern::Class(class) => starts
                .iter()
                .filter_map(|&start| {
                    let c = input[start..].chars().next()?;
                    class.contains(c).then(|| start + c.len_utf8())
                })
                .collect(),
            Pattern::Any => starts
                .iter()
                .filter_map(|&start| {
                    let c = input[start..].chars().next()?;
                    (c != '\n').then(|| start + c.len_utf8())
                })
                .collect(),
            Pattern::Concat(parts) => {
                let mut current = starts.to_vec();
                for part in parts {
                    if current.is_empty() {
                        break;
                    }
                    current = self.ends(part, &current);
                }
                return current;
            }
            Pattern::Alternation(branches) => branches
                .iter()
                .flat_map(|branch| self.ends(branch, starts))
                .collect(),
            Pattern::Repeat { inner, min, max } => self.repeat(inner, *min, *max, starts),
            Pattern::Anchor(anchor) => starts
                .iter()
                .copied()
                .filter(|&start| self.at_anchor(*anchor, start))
                .collect(),
        };

        out.sort_unstable();
        out.dedup();
        out
    }

    fn repeat(&self, inner: &Pattern, min: u32, max: Option<u32>, starts: &[usize]) -> Vec<usize> {
        let mut result: Vec<usize> = vec![];
        // Positions already reached with at least `min` repetitions. Reaching one
        // again cannot lead anywhere new, which also stops nullable bodies.
        let mut seen: BTreeSet<usize> = BTreeSet::new();

        if min == 0 {
            seen.extend(starts.iter().copied());
            result.extend_from_slice(starts);
        }

        let mut current = starts.to_vec();
        let mut count: u32 = 0;

        while !current.is_empty() {
            if max.is_some_and(|max| count >= max) {
                break;
            }
            count += 1;

            let next = self.ends(inner, &current);
            current = if count >= min {
                let fresh: Vec<usize> = next.into_iter().filter(|end| seen.insert(*end)).collect();
                result.extend_from_slice(&fresh);
                fresh
            } else {
                next
            };
        }

        result
    }

    fn at_anchor(&self, anchor: Anchor, offset: usize) -> bool {
        let input = self.input.as_bytes();

        match anchor {
            Anchor::LineStart => self.lines.is_line_start(input, offset),
            Anchor::LineEnd => self.lines.is_line_end(input, offset),
        }
    }
}
