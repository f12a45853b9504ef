//! Built-in rule sets.
//!
//! - `NUMBER_LITERALS` - strings, dots and hex / binary / decimal numbers
//! - `C_LIKE` - keywords, identifiers, literals and operators of a small
//!   C-style language
//!
//! Keywords are declared before the identifier rule, so on an equal-length
//! match the keyword wins while longer words (`letter`) stay identifiers.

use lazy_static::lazy_static;

use crate::{
    rules::{RuleSpec, RuleTable},
    MK_RULE,
};

lazy_static! {
    pub static ref NUMBER_LITERALS: RuleTable =
        RuleTable::build(number_literal_rules()).expect("number literal rules are valid");
    pub static ref C_LIKE: RuleTable = RuleTable::build(c_like_rules()).expect("C-like rules are valid");
}

pub const KEYWORDS: [&str; 19] = [
    "let", "const", "new", "import", "from", "return", "fn", "if", "else", "foreach", "while",
    "for", "break", "export", "typeof", "in", "struct", "extern", "true",
];

pub fn number_literal_rules() -> Vec<RuleSpec> {
    vec![
        MK_RULE!("string", r#""[^"]*"|'[^']*'"# => "STRING"),
        MK_RULE!("dot", r"\." => "DOT"),
        MK_RULE!("hex", "0x[0-9a-fA-F]+" => "HEX"),
        MK_RULE!("bin", "0b[01]+" => "BIN"),
        MK_RULE!("dec", r"[0-9]+(\.[0-9]+)?" => "DEC"),
        MK_RULE!("whitespace", r"\s+" => "WHITESPACE", skip),
    ]
}

pub fn c_like_rules() -> Vec<RuleSpec> {
    let mut rules: Vec<RuleSpec> = KEYWORDS
        .iter()
        .map(|keyword| RuleSpec::literal(keyword, keyword, &keyword.to_uppercase()))
        .collect();

    rules.extend(vec![
        MK_RULE!("identifier", "[a-zA-Z_][a-zA-Z0-9_]*" => "IDENTIFIER"),
        MK_RULE!("number", r"[0-9]+(\.[0-9]+)?" => "NUMBER"),
        MK_RULE!("whitespace", r"\s+" => "WHITESPACE", skip),
        MK_RULE!("string", r#""([^"\\]|\\.)*""# => "STRING"),
        MK_RULE!("comment", "//.*" => "COMMENT", skip),
        MK_RULE!("block_comment", r"/\*([^*]|\*+[^*/])*\*+/" => "COMMENT", skip),
        MK_RULE!("open_bracket", r"\[" => "OPEN_BRACKET"),
        MK_RULE!("close_bracket", r"\]" => "CLOSE_BRACKET"),
        MK_RULE!("open_curly", r"\{" => "OPEN_CURLY"),
        MK_RULE!("close_curly", r"\}" => "CLOSE_CURLY"),
        MK_RULE!("open_paren", r"\(" => "OPEN_PAREN"),
        MK_RULE!("close_paren", r"\)" => "CLOSE_PAREN"),
        MK_RULE!("equals", "==" => "EQUALS"),
        MK_RULE!("not_equals", "!=" => "NOT_EQUALS"),
        MK_RULE!("not", "!" => "NOT"),
        MK_RULE!("assignment", "=" => "ASSIGNMENT"),
        MK_RULE!("less_equals", "<=" => "LESS_EQUALS"),
        MK_RULE!("less", "<" => "LESS"),
        MK_RULE!("greater_equals", ">=" => "GREATER_EQUALS"),
        MK_RULE!("greater", ">" => "GREATER"),
        MK_RULE!("or", r"\|\|" => "OR"),
        MK_RULE!("and", "&&" => "AND"),
        MK_RULE!("ellipsis", r"\.\.\." => "ELLIPSIS"),
        MK_RULE!("dot", r"\." => "DOT"),
        MK_RULE!("semicolon", ";" => "SEMICOLON"),
        MK_RULE!("colon", ":" => "COLON"),
        MK_RULE!("question", r"\?" => "QUESTION"),
        MK_RULE!("comma", "," => "COMMA"),
        MK_RULE!("plus_plus", r"\+\+" => "PLUS_PLUS"),
        MK_RULE!("arrow", "->" => "ARROW"),
        MK_RULE!("minus_minus", "--" => "MINUS_MINUS"),
        MK_RULE!("plus_equals", r"\+=" => "PLUS_EQUALS"),
        MK_RULE!("minus_equals", "-=" => "MINUS_EQUALS"),
        MK_RULE!("slash_equals", "/=" => "SLASH_EQUALS"),
        MK_RULE!("star_equals", r"\*=" => "STAR_EQUALS"),
        MK_RULE!("plus", r"\+" => "PLUS"),
        MK_RULE!("dash", "-" => "DASH"),
        MK_RULE!("slash", "/" => "SLASH"),
        MK_RULE!("star", r"\*" => "STAR"),
        MK_RULE!("percent", "%" => "PERCENT"),
        MK_RULE!("tilde", "~" => "TILDE"),
    ]);

    rules
}
