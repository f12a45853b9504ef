//! Per-scan configuration.
//!
//! A [`ScanConfig`] is plain data: it can be built in code with the
//! `with_*` setters or deserialized next to the rules in a rule file.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// `"\r\n"` comes first so it is taken as one terminator, not two.
    pub static ref DEFAULT_LINE_TERMINATORS: Vec<String> =
        vec![String::from("\r\n"), String::from("\n")];
}

/// What the scanner does with bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingPolicy {
    /// Report the malformed sequence, replace it with U+FFFD and keep going.
    #[default]
    Recover,
    /// Report the malformed sequence and end the stream.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Sequences that end a line. Empty entries are ignored.
    pub line_terminators: Vec<String>,
    pub encoding: EncodingPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            line_terminators: DEFAULT_LINE_TERMINATORS.clone(),
            encoding: EncodingPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn with_line_terminators<I, S>(mut self, terminators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.line_terminators = terminators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingPolicy) -> Self {
        self.encoding = encoding;
        self
    }
}
