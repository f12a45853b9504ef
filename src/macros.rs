//! Utility macros.
//!
//! - `MK_RULE!` - declares a `RuleSpec`
//! - `MK_TOKEN!` - creates a `Token` instance
//!
//! These macros keep rule lists and the scanner free of struct boilerplate.

/// Declares a [`RuleSpec`](crate::rules::RuleSpec) in pattern syntax.
///
/// # Example
///
/// ```ignore
/// let rules = vec![
///     MK_RULE!("if", "if" => "KEYWORD"),
///     MK_RULE!("ident", "[a-z]+" => "IDENT"),
///     MK_RULE!("ws", r"\s+" => "WHITESPACE", skip),
///     MK_RULE!("word", "[a-z]+" => "WORD", priority = 5),
/// ];
/// ```
#[macro_export]
macro_rules! MK_RULE {
    ($id:expr, $pattern:expr => $kind:expr) => {
        $crate::rules::RuleSpec::new($id, $pattern, $kind)
    };
    ($id:expr, $pattern:expr => $kind:expr, skip) => {
        $crate::rules::RuleSpec::new($id, $pattern, $kind).skipped()
    };
    ($id:expr, $pattern:expr => $kind:expr, priority = $priority:expr) => {
        $crate::rules::RuleSpec::new($id, $pattern, $kind).with_priority($priority)
    };
}

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$lexeme` - The matched text
/// * `$span` - The byte span
/// * `$position` - Line and column of the first character
/// * `$skippable` - Whether the filtered stream hides it
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $lexeme:expr, $span:expr, $position:expr, $skippable:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            lexeme: $lexeme,
            span: $span,
            position: $position,
            skippable: $skippable,
        }
    };
}
