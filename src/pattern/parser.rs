//! Parser for the textual pattern syntax.
//!
//! The syntax is a small regular-expression dialect: literals, `.`, `[...]`
//! classes, `\d \w \s` shorthands, `( | )` groups, `* + ? {m,n}` repetition
//! and the `^ $` line anchors. Anything the matcher could not evaluate
//! sensibly (empty branches, stacked quantifiers, reversed ranges) is
//! rejected here so a built rule table never holds a malformed pattern.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::ast::{Anchor, CharClass, ClassRange, Pattern};

/// Largest bound accepted in `{m,n}`.
pub const REPEAT_LIMIT: u32 = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct PatternError {
    pub kind: PatternErrorKind,
    pub offset: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternErrorKind {
    #[error("empty pattern")]
    Empty,
    #[error("unbalanced parenthesis")]
    UnbalancedParen,
    #[error("empty alternation branch")]
    EmptyBranch,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("empty character class")]
    EmptyClass,
    #[error("invalid class range {start:?}-{end:?}")]
    InvalidRange { start: char, end: char },
    #[error("quantifier {0:?} has nothing to repeat")]
    NothingToRepeat(char),
    #[error("invalid repetition bounds")]
    InvalidBounds,
    #[error("repetition bound exceeds {}", REPEAT_LIMIT)]
    BoundTooLarge,
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(String),
    #[error("trailing backslash")]
    TrailingBackslash,
}

/// Parses pattern text into a [`Pattern`].
pub fn parse(source: &str) -> Result<Pattern, PatternError> {
    if source.is_empty() {
        return Err(PatternError {
            kind: PatternErrorKind::Empty,
            offset: 0,
        });
    }

    let mut parser = Parser {
        source,
        chars: source.char_indices().peekable(),
        depth: 0,
    };

    let pattern = parser.parse_alternation()?;

    match parser.chars.next() {
        // Only a stray `)` can stop the top-level alternation early.
        Some((offset, _)) => Err(PatternError {
            kind: PatternErrorKind::UnbalancedParen,
            offset,
        }),
        None => Ok(pattern),
    }
}

/// A pattern matching `text` exactly, with no metacharacters.
pub fn literal(text: &str) -> Result<Pattern, PatternError> {
    if text.is_empty() {
        return Err(PatternError {
            kind: PatternErrorKind::Empty,
            offset: 0,
        });
    }

    Ok(Pattern::literal(text))
}

enum Atom {
    Pattern(Pattern),
    Anchor(Anchor),
}

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.source.len())
    }

    fn error<T>(&mut self, kind: PatternErrorKind) -> Result<T, PatternError> {
        let offset = self.offset();
        Err(PatternError { kind, offset })
    }

    fn parse_alternation(&mut self) -> Result<Pattern, PatternError> {
        let mut branches = vec![self.parse_concat()?];

        while let Some((_, '|')) = self.chars.peek() {
            self.chars.next();
            branches.push(self.parse_concat()?);
        }

        if branches.len() == 1 {
            return Ok(branches.remove(0));
        }

        Ok(Pattern::Alternation(branches))
    }

    fn parse_concat(&mut self) -> Result<Pattern, PatternError> {
        let mut parts: Vec<Pattern> = vec![];

        loop {
            match self.chars.peek().copied() {
                None | Some((_, '|')) => break,
                Some((offset, ')')) => {
                    if self.depth == 0 {
                        return Err(PatternError {
                            kind: PatternErrorKind::UnbalancedParen,
                            offset,
                        });
                    }
                    break;
                }
                Some((_, quantifier @ ('*' | '+' | '?' | '{'))) => {
                    return self.error(PatternErrorKind::NothingToRepeat(quantifier));
                }
                Some(_) => {}
            }

            let atom = self.parse_atom()?;
            let part = match atom {
                Atom::Anchor(anchor) => {
                    if let Some((_, quantifier @ ('*' | '+' | '?' | '{'))) = self.chars.peek().copied() {
                        return self.error(PatternErrorKind::NothingToRepeat(quantifier));
                    }
                    Pattern::Anchor(anchor)
                }
                Atom::Pattern(pattern) => self.parse_quantifier(pattern)?,
            };

            // Adjacent single characters fold back into one literal.
            match (parts.last_mut(), part) {
                (Some(Pattern::Literal(prev)), Pattern::Literal(next)) => prev.push_str(&next),
                (_, part) => parts.push(part),
            }
        }

        match parts.len() {
            0 => self.error(PatternErrorKind::EmptyBranch),
            1 => Ok(parts.remove(0)),
            _ => Ok(Pattern::Concat(parts)),
        }
    }

    fn parse_quantifier(&mut self, pattern: Pattern) -> Result<Pattern, PatternError> {
        let (min, max) = match self.chars.peek().copied() {
            Some((_, '*')) => {
                self.chars.next();
                (0, None)
            }
            Some((_, '+')) => {
                self.chars.next();
                (1, None)
            }
            Some((_, '?')) => {
                self.chars.next();
                (0, Some(1))
            }
            Some((_, '{')) => {
                self.chars.next();
                self.parse_bounds()?
            }
            _ => return Ok(pattern),
        };

        if let Some((_, quantifier @ ('*' | '+' | '?' | '{'))) = self.chars.peek().copied() {
            return self.error(PatternErrorKind::NothingToRepeat(quantifier));
        }

        Ok(Pattern::repeat(pattern, min, max))
    }

    fn parse_bounds(&mut self) -> Result<(u32, Option<u32>), PatternError> {
        let min = match self.parse_number()? {
            Some(min) => min,
            None => return self.error(PatternErrorKind::InvalidBounds),
        };

        let max = match self.chars.next() {
            Some((_, '}')) => Some(min),
            Some((_, ',')) => {
                let max = self.parse_number()?;
                match self.chars.next() {
                    Some((_, '}')) => max,
                    _ => return self.error(PatternErrorKind::InvalidBounds),
                }
            }
            _ => return self.error(PatternErrorKind::InvalidBounds),
        };

        if let Some(max) = max {
            if max < min {
                return self.error(PatternErrorKind::InvalidBounds);
            }
        }

        Ok((min, max))
    }

    fn parse_number(&mut self) -> Result<Option<u32>, PatternError> {
        let mut value: Option<u32> = None;

        while let Some((_, c)) = self.chars.peek().copied() {
            let Some(digit) = c.to_digit(10) else { break };
            self.chars.next();

            let next = value.unwrap_or(0).saturating_mul(10).saturating_add(digit);
            if next > REPEAT_LIMIT {
                return self.error(PatternErrorKind::BoundTooLarge);
            }
            value = Some(next);
        }

        Ok(value)
    }

    fn parse_atom(&mut self) -> Result<Atom, PatternError> {
        let Some((offset, c)) = self.chars.next() else {
            return self.error(PatternErrorKind::EmptyBranch);
        };

        let pattern = match c {
            '(' => {
                self.depth += 1;
                let inner = self.parse_alternation()?;
                match self.chars.next() {
                    Some((_, ')')) => {}
                    _ => {
                        return Err(PatternError {
                            kind: PatternErrorKind::UnbalancedParen,
                            offset,
                        })
                    }
                }
                self.depth -= 1;
                inner
            }
            '[' => Pattern::Class(self.parse_class(offset)?),
            '.' => Pattern::Any,
            '^' => return Ok(Atom::Anchor(Anchor::LineStart)),
            '$' => return Ok(Atom::Anchor(Anchor::LineEnd)),
            '\\' => match self.parse_escape(offset)? {
                Escape::Char(c) => Pattern::Literal(c.to_string()),
                Escape::Class(class) => Pattern::Class(class),
            },
            c => Pattern::Literal(c.to_string()),
        };

        Ok(Atom::Pattern(pattern))
    }

    fn parse_class(&mut self, open: usize) -> Result<CharClass, PatternError> {
        let unterminated = PatternError {
            kind: PatternErrorKind::UnterminatedClass,
            offset: open,
        };

        let negated = matches!(self.chars.peek(), Some((_, '^')));
        if negated {
            self.chars.next();
        }

        let mut ranges = vec![];

        loop {
            let Some((offset, c)) = self.chars.next() else {
                return Err(unterminated);
            };

            let start = match c {
                ']' => break,
                '\\' => match self.parse_escape(offset)? {
                    Escape::Char(c) => c,
                    Escape::Class(class) => {
                        ranges.extend(class_ranges(&class));
                        continue;
                    }
                },
                c => c,
            };

            // `-` right before `]` is a literal dash.
            let here = self.offset();
            let is_range = self.source[here..].starts_with('-') && !self.source[here..].starts_with("-]");
            if !is_range {
                ranges.push(ClassRange(start, start));
                continue;
            }
            self.chars.next();

            let end = match self.chars.next() {
                None => return Err(unterminated),
                Some((offset, '\\')) => match self.parse_escape(offset)? {
                    Escape::Char(c) => c,
                    Escape::Class(_) => {
                        return Err(PatternError {
                            kind: PatternErrorKind::InvalidRange { start, end: '\\' },
                            offset,
                        })
                    }
                },
                Some((_, c)) => c,
            };

            if end < start {
                return Err(PatternError {
                    kind: PatternErrorKind::InvalidRange { start, end },
                    offset,
                });
            }
            ranges.push(ClassRange(start, end));
        }

        if ranges.is_empty() {
            return Err(PatternError {
                kind: PatternErrorKind::EmptyClass,
                offset: open,
            });
        }

        Ok(CharClass { negated, ranges })
    }

    fn parse_escape(&mut self, backslash: usize) -> Result<Escape, PatternError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(PatternError {
                kind: PatternErrorKind::TrailingBackslash,
                offset: backslash,
            });
        };

        let invalid = |text: String| PatternError {
            kind: PatternErrorKind::InvalidEscape(text),
            offset: backslash,
        };

        let escape = match c {
            'n' => Escape::Char('\n'),
            'r' => Escape::Char('\r'),
            't' => Escape::Char('\t'),
            '0' => Escape::Char('\0'),
            'f' => Escape::Char('\x0C'),
            'v' => Escape::Char('\x0B'),
            'd' => Escape::Class(CharClass::new(DIGIT.to_vec())),
            'w' => Escape::Class(CharClass::new(WORD.to_vec())),
            's' => Escape::Class(CharClass::new(SPACE.to_vec())),
            'D' => Escape::Class(CharClass::negated(DIGIT.to_vec())),
            'W' => Escape::Class(CharClass::negated(WORD.to_vec())),
            'S' => Escape::Class(CharClass::negated(SPACE.to_vec())),
            'x' => {
                let mut hex = String::new();
                for _ in 0..2 {
                    match self.chars.next() {
                        Some((_, h)) if h.is_ascii_hexdigit() => hex.push(h),
                        _ => return Err(invalid(format!("x{}", hex))),
                    }
                }
                let value = u32::from_str_radix(&hex, 16).map_err(|_| invalid(format!("x{}", hex)))?;
                match char::from_u32(value) {
                    Some(c) => Escape::Char(c),
                    None => return Err(invalid(format!("x{}", hex))),
                }
            }
            'u' => {
                let mut hex = String::new();
                if !matches!(self.chars.next(), Some((_, '{'))) {
                    return Err(invalid(String::from("u")));
                }
                loop {
                    match self.chars.next() {
                        Some((_, '}')) => break,
                        Some((_, h)) if h.is_ascii_hexdigit() && hex.len() < 6 => hex.push(h),
                        _ => return Err(invalid(format!("u{{{}", hex))),
                    }
                }
                let c = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(format!("u{{{}}}", hex)))?;
                Escape::Char(c)
            }
            c if c.is_ascii_punctuation() || c == ' ' => Escape::Char(c),
            c => return Err(invalid(c.to_string())),
        };

        Ok(escape)
    }
}

enum Escape {
    Char(char),
    Class(CharClass),
}

const DIGIT: [ClassRange; 1] = [ClassRange('0', '9')];
const WORD: [ClassRange; 4] = [
    ClassRange('0', '9'),
    ClassRange('A', 'Z'),
    ClassRange('_', '_'),
    ClassRange('a', 'z'),
];
const SPACE: [ClassRange; 2] = [ClassRange('\t', '\r'), ClassRange(' ', ' ')];

/// Ranges covered by `class`, resolving negation into the complement.
fn class_ranges(class: &CharClass) -> Vec<ClassRange> {
    if !class.negated {
        return class.ranges.clone();
    }

    let mut sorted = class.ranges.clone();
    sorted.sort_by_key(|ClassRange(lo, _)| *lo);

    let mut complement = vec![];
    let mut next = Some('\0');

    for ClassRange(lo, hi) in sorted {
        if let Some(from) = next {
            if from < lo {
                if let Some(to) = char_before(lo) {
                    complement.push(ClassRange(from, to));
                }
            }
        }
        next = match next {
            Some(from) if from > hi => Some(from),
            _ => char_after(hi),
        };
    }

    if let Some(from) = next {
        complement.push(ClassRange(from, char::MAX));
    }

    complement
}

fn char_after(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        c => char::from_u32(c as u32 + 1),
    }
}

fn char_before(c: char) -> Option<char> {
    match c {
        '\0' => None,
        '\u{E000}' => Some('\u{D7FF}'),
        c => char::from_u32(c as u32 - 1),
    }
}
