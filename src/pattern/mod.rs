//! Lexical patterns.
//!
//! This module holds everything about a single rule's pattern:
//!
//! - `ast` - the closed [`Pattern`] type and its static properties
//! - `parser` - the textual pattern syntax
//! - `matcher` - longest-match evaluation at an input offset

pub mod ast;
pub mod matcher;
pub mod parser;


pub use ast::{Anchor, CharClass, ClassRange, FirstSet, Pattern};
pub use matcher::{match_at, match_at_with};
pub use parser::{parse, PatternError, PatternErrorKind, REPEAT_LIMIT};
