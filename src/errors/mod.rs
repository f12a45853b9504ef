//! Error types and error handling for the scanner.
//!
//! This module defines:
//!
//! - `InvalidRuleError` - fatal problems found while building a rule table
//! - `ScanError` - recoverable problems found while scanning, with position
//! - Error names and suggestions for diagnostics

pub mod errors;

#[cfg(test)]
mod tests;
