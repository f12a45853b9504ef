use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::parser::{PatternError, PatternErrorKind, REPEAT_LIMIT};

/// A compiled lexical pattern.
///
/// The variant set is closed: every pattern is one of these shapes and the
/// matcher handles each of them exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Literal(String),
    Class(CharClass),
    /// Any scalar value except `\n`.
    Any,
    Concat(Vec<Pattern>),
    Alternation(Vec<Pattern>),
    Repeat {
        inner: Box<Pattern>,
        min: u32,
        max: Option<u32>,
    },
    Anchor(Anchor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    LineStart,
    LineEnd,
}

/// Inclusive range of scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRange(pub char, pub char);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClass {
    #[serde(default)]
    pub negated: bool,
    pub ranges: Vec<ClassRange>,
}

impl CharClass {
    pub fn new(ranges: Vec<ClassRange>) -> Self {
        CharClass {
            negated: false,
            ranges,
        }
    }

    pub fn negated(ranges: Vec<ClassRange>) -> Self {
        CharClass {
            negated: true,
            ranges,
        }
    }

    pub fn contains(&self, c: char) -> bool {
        let hit = self.ranges.iter().any(|ClassRange(lo, hi)| *lo <= c && c <= *hi);
        hit != self.negated
    }
}

/// Characters a non-empty match may start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstSet {
    Any,
    Ranges(Vec<ClassRange>),
}

impl FirstSet {
    fn union(self, other: FirstSet) -> FirstSet {
        match (self, other) {
            (FirstSet::Ranges(mut a), FirstSet::Ranges(b)) => {
                a.extend(b);
                FirstSet::Ranges(a)
            }
            _ => FirstSet::Any,
        }
    }

    pub fn contains(&self, c: char) -> bool {
        match self {
            FirstSet::Any => true,
            FirstSet::Ranges(ranges) => ranges.iter().any(|ClassRange(lo, hi)| *lo <= c && c <= *hi),
        }
    }

    /// True when some member is outside ASCII.
    pub fn reaches_non_ascii(&self) -> bool {
        match self {
            FirstSet::Any => true,
            FirstSet::Ranges(ranges) => ranges.iter().any(|ClassRange(_, hi)| !hi.is_ascii()),
        }
    }
}

impl Pattern {
    pub fn literal(text: &str) -> Pattern {
        Pattern::Literal(String::from(text))
    }

    pub fn class(ranges: Vec<ClassRange>) -> Pattern {
        Pattern::Class(CharClass::new(ranges))
    }

    pub fn concat(parts: Vec<Pattern>) -> Pattern {
        Pattern::Concat(parts)
    }

    pub fn alternation(branches: Vec<Pattern>) -> Pattern {
        Pattern::Alternation(branches)
    }

    pub fn repeat(inner: Pattern, min: u32, max: Option<u32>) -> Pattern {
        Pattern::Repeat {
            inner: Box::new(inner),
            min,
            max,
        }
    }

    pub fn star(inner: Pattern) -> Pattern {
        Pattern::repeat(inner, 0, None)
    }

    pub fn plus(inner: Pattern) -> Pattern {
        Pattern::repeat(inner, 1, None)
    }

    pub fn optional(inner: Pattern) -> Pattern {
        Pattern::repeat(inner, 0, Some(1))
    }

    /// Whether the pattern can match the empty string.
    pub fn is_nullable(&self) -> bool {
        match self {
            Pattern::Literal(text) => text.is_empty(),
            Pattern::Class(_) | Pattern::Any => false,
            Pattern::Concat(parts) => parts.iter().all(Pattern::is_nullable),
            Pattern::Alternation(branches) => branches.iter().any(Pattern::is_nullable),
            Pattern::Repeat { inner, min, .. } => *min == 0 || inner.is_nullable(),
            Pattern::Anchor(_) => true,
        }
    }

    /// Characters that can begin a non-empty match.
    ///
    /// Zero-length matches never produce tokens, so this is exact for
    /// candidate pruning even when the pattern is nullable.
    pub fn first_set(&self) -> FirstSet {
        match self {
            Pattern::Literal(text) => match text.chars().next() {
                Some(c) => FirstSet::Ranges(vec![ClassRange(c, c)]),
                None => FirstSet::Ranges(vec![]),
            },
            Pattern::Class(class) if !class.negated => FirstSet::Ranges(class.ranges.clone()),
            Pattern::Class(_) | Pattern::Any => FirstSet::Any,
            Pattern::Concat(parts) => {
                let mut first = FirstSet::Ranges(vec![]);
                for part in parts {
                    first = first.union(part.first_set());
                    if !part.is_nullable() {
                        break;
                    }
                }
                first
            }
            Pattern::Alternation(branches) => branches
                .iter()
                .fold(FirstSet::Ranges(vec![]), |acc, branch| acc.union(branch.first_set())),
            Pattern::Repeat { max: Some(0), .. } => FirstSet::Ranges(vec![]),
            Pattern::Repeat { inner, .. } => inner.first_set(),
            Pattern::Anchor(_) => FirstSet::Ranges(vec![]),
        }
    }

    /// Checks a structured pattern against the rules the parser enforces on
    /// pattern text.
    pub fn validate(&self) -> Result<(), PatternError> {
        let fail = |kind| Err(PatternError { kind, offset: 0 });

        match self {
            Pattern::Literal(_) | Pattern::Any | Pattern::Anchor(_) => Ok(()),
            Pattern::Class(class) => {
                if class.ranges.is_empty() {
                    return fail(PatternErrorKind::EmptyClass);
                }
                for ClassRange(lo, hi) in &class.ranges {
                    if lo > hi {
                        return fail(PatternErrorKind::InvalidRange { start: *lo, end: *hi });
                    }
                }
                Ok(())
            }
            Pattern::Concat(parts) => parts.iter().try_for_each(Pattern::validate),
            Pattern::Alternation(branches) => {
                if branches.is_empty() {
                    return fail(PatternErrorKind::EmptyBranch);
                }
                branches.iter().try_for_each(Pattern::validate)
            }
            Pattern::Repeat { inner, min, max } => {
                if let Some(max) = max {
                    if max < min {
                        return fail(PatternErrorKind::InvalidBounds);
                    }
                }
                if *min > REPEAT_LIMIT || max.is_some_and(|max| max > REPEAT_LIMIT) {
                    return fail(PatternErrorKind::BoundTooLarge);
                }
                if let Pattern::Anchor(_) = inner.as_ref() {
                    return fail(PatternErrorKind::NothingToRepeat('*'));
                }
                inner.validate()
            }
        }
    }
}

fn write_escaped(f: &mut std::fmt::Formatter<'_>, c: char, in_class: bool) -> std::fmt::Result {
    match c {
        '\n' => write!(f, "\\n"),
        '\r' => write!(f, "\\r"),
        '\t' => write!(f, "\\t"),
        '\0' => write!(f, "\\0"),
        '\\' | '[' | ']' => write!(f, "\\{}", c),
        '^' | '-' if in_class => write!(f, "\\{}", c),
        '.' | '(' | ')' | '|' | '*' | '+' | '?' | '{' | '}' | '$' | '^' if !in_class => {
            write!(f, "\\{}", c)
        }
        c if c.is_control() => write!(f, "\\u{{{:X}}}", c as u32),
        c => write!(f, "{}", c),
    }
}

/// Renders the pattern back into pattern syntax.
impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Literal(text) => text.chars().try_for_each(|c| write_escaped(f, c, false)),
            Pattern::Class(class) => {
                write!(f, "[")?;
                if class.negated {
                    write!(f, "^")?;
                }
                for ClassRange(lo, hi) in &class.ranges {
                    write_escaped(f, *lo, true)?;
                    if lo != hi {
                        write!(f, "-")?;
                        write_escaped(f, *hi, true)?;
                    }
                }
                write!(f, "]")
            }
            Pattern::Any => write!(f, "."),
            Pattern::Concat(parts) => {
                for part in parts {
                    match part {
                        Pattern::Alternation(_) => write!(f, "({})", part)?,
                        _ => write!(f, "{}", part)?,
                    }
                }
                Ok(())
            }
            Pattern::Alternation(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", branch)?;
                }
                Ok(())
            }
            Pattern::Repeat { inner, min, max } => {
                let single = match inner.as_ref() {
                    Pattern::Literal(text) => text.chars().count() == 1,
                    Pattern::Class(_) | Pattern::Any => true,
                    _ => false,
                };
                if single {
                    write!(f, "{}", inner)?;
                } else {
                    write!(f, "({})", inner)?;
                }
                match (min, max) {
                    (0, None) => write!(f, "*"),
                    (1, None) => write!(f, "+"),
                    (0, Some(1)) => write!(f, "?"),
                    (min, None) => write!(f, "{{{},}}", min),
                    (min, Some(max)) if min == max => write!(f, "{{{}}}", min),
                    (min, Some(max)) => write!(f, "{{{},{}}}", min, max),
                }
            }
            Pattern::Anchor(Anchor::LineStart) => write!(f, "^"),
            Pattern::Anchor(Anchor::LineEnd) => write!(f, "$"),
        }
    }
}
