use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScanConfig;
use crate::errors::errors::InvalidRuleError;
use crate::pattern::{self, Pattern, PatternError};

/// Where a rule's pattern comes from.
///
/// In a rule file a bare string is pattern syntax; `{"literal": ..}`,
/// `{"regex": ..}` and `{"structured": ..}` name the form explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "RawPatternSource")]
pub enum PatternSource {
    Regex(String),
    Literal(String),
    Structured(Pattern),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPatternSource {
    Bare(String),
    Tagged(TaggedPatternSource),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedPatternSource {
    Regex(String),
    Literal(String),
    Structured(Pattern),
}

impl From<RawPatternSource> for PatternSource {
    fn from(raw: RawPatternSource) -> Self {
        match raw {
            RawPatternSource::Bare(source) => PatternSource::Regex(source),
            RawPatternSource::Tagged(TaggedPatternSource::Regex(source)) => PatternSource::Regex(source),
            RawPatternSource::Tagged(TaggedPatternSource::Literal(text)) => PatternSource::Literal(text),
            RawPatternSource::Tagged(TaggedPatternSource::Structured(pattern)) => {
                PatternSource::Structured(pattern)
            }
        }
    }
}

impl PatternSource {
    pub fn compile(&self) -> Result<Pattern, PatternError> {
        match self {
            PatternSource::Regex(source) => pattern::parse(source),
            PatternSource::Literal(text) => pattern::parser::literal(text),
            PatternSource::Structured(pattern) => {
                pattern.validate()?;
                Ok(pattern.clone())
            }
        }
    }
}

/// One rule declaration, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: String,
    pub pattern: PatternSource,
    pub kind: String,
    /// Overrides declaration order when two rules match the same length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Tokens from this rule are hidden from the filtered stream.
    #[serde(default)]
    pub skip: bool,
}

impl RuleSpec {
    /// A rule whose pattern is written in pattern syntax.
    pub fn new(id: &str, pattern: &str, kind: &str) -> Self {
        RuleSpec {
            id: String::from(id),
            pattern: PatternSource::Regex(String::from(pattern)),
            kind: String::from(kind),
            priority: None,
            skip: false,
        }
    }

    pub fn literal(id: &str, text: &str, kind: &str) -> Self {
        RuleSpec {
            pattern: PatternSource::Literal(String::from(text)),
            ..RuleSpec::new(id, "", kind)
        }
    }

    pub fn structured(id: &str, pattern: Pattern, kind: &str) -> Self {
        RuleSpec {
            pattern: PatternSource::Structured(pattern),
            ..RuleSpec::new(id, "", kind)
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// A validated rule inside a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    pattern: Pattern,
    kind: Arc<str>,
    priority: i32,
    skip: bool,
    index: usize,
}

impl Rule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn shared_kind(&self) -> Arc<str> {
        Arc::clone(&self.kind)
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_skip(&self) -> bool {
        self.skip
    }

    /// Declaration order, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether `self` beats `other` when both matched `len` bytes.
    ///
    /// Higher priority wins, then the earlier declaration.
    pub fn outranks(&self, other: &Rule) -> bool {
        (self.priority, std::cmp::Reverse(self.index)) > (other.priority, std::cmp::Reverse(other.index))
    }
}

const ASCII_BUCKETS: usize = 128;

/// An ordered, immutable set of rules.
///
/// Disambiguation is longest match first; among equally long matches the
/// higher priority wins and then the rule declared first. The table never
/// changes after [`RuleTable::build`], so it can be shared across threads
/// without locking.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    // Rule indexes per leading ASCII character, in declaration order.
    ascii_index: Vec<Vec<usize>>,
    non_ascii: Vec<usize>,
}

impl RuleTable {
    /// Validates `specs` and builds the table. Nothing is built if any
    /// declaration is rejected.
    pub fn build<I>(specs: I) -> Result<RuleTable, InvalidRuleError>
    where
        I: IntoIterator<Item = RuleSpec>,
    {
        let mut ids: HashSet<String> = HashSet::new();
        let mut rules = vec![];

        for (index, spec) in specs.into_iter().enumerate() {
            if spec.id.trim().is_empty() {
                return Err(InvalidRuleError::EmptyId { index });
            }
            if spec.kind.trim().is_empty() {
                return Err(InvalidRuleError::EmptyKind { rule: spec.id });
            }
            if !ids.insert(spec.id.clone()) {
                return Err(InvalidRuleError::DuplicateId { rule: spec.id });
            }

            let pattern = spec
                .pattern
                .compile()
                .map_err(|source| InvalidRuleError::Pattern {
                    rule: spec.id.clone(),
                    source,
                })?;

            debug!(
                target: "rulelex::rules",
                rule = %spec.id,
                kind = %spec.kind,
                %pattern,
                "Registering rule"
            );

            rules.push(Rule {
                id: spec.id,
                pattern,
                kind: Arc::from(spec.kind.as_str()),
                priority: spec.priority.unwrap_or(0),
                skip: spec.skip,
                index,
            });
        }

        let mut ascii_index = vec![vec![]; ASCII_BUCKETS];
        let mut non_ascii = vec![];

        for rule in &rules {
            let first = rule.pattern.first_set();

            for (byte, bucket) in ascii_index.iter_mut().enumerate() {
                if first.contains(char::from(byte as u8)) {
                    bucket.push(rule.index);
                }
            }
            if first.reaches_non_ascii() {
                non_ascii.push(rule.index);
            }
        }

        debug!(
            target: "rulelex::rules",
            rules = rules.len(),
            non_ascii = non_ascii.len(),
            "Built rule table"
        );

        Ok(RuleTable {
            rules,
            ascii_index,
            non_ascii,
        })
    }

    /// Rules that could produce a non-empty match at `offset`, in
    /// declaration order. Empty at the end of input.
    pub fn lookup_candidates<'t>(&'t self, input: &str, offset: usize) -> impl Iterator<Item = &'t Rule> + 't {
        let bucket: &[usize] = match input.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(c) if c.is_ascii() => &self.ascii_index[c as usize],
            Some(_) => &self.non_ascii,
            None => &[],
        };

        bucket.iter().map(move |&index| &self.rules[index])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The on-disk rule format: the declarations plus optional scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub config: ScanConfig,
}

impl RuleFile {
    pub fn from_json(text: &str) -> Result<RuleFile, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn build(self) -> Result<(RuleTable, ScanConfig), InvalidRuleError> {
        Ok((RuleTable::build(self.rules)?, self.config))
    }
}
