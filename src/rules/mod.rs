//! Rule declarations and the rule table.
//!
//! Rules are declared as [`RuleSpec`]s (in code, with the `MK_RULE!` macro,
//! or from a JSON [`RuleFile`]) and validated once into a [`RuleTable`].

pub mod table;

#[cfg(test)]
mod tests;

pub use table::{PatternSource, Rule, RuleFile, RuleSpec, RuleTable};
