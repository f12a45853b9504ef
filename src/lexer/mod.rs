//! Lexical analysis.
//!
//! This module turns input text into tokens using a [`RuleTable`]:
//!
//! - `scanner` - the single-pass, longest-match state machine
//! - `position` - line and column tracking
//! - `tokens` - tokens and stream events
//! - `stream` - filtered streams and `tokenize` helpers
//!
//! [`RuleTable`]: crate::rules::RuleTable

pub mod position;
pub mod scanner;
pub mod stream;
pub mod tokens;
