//! Python identifier derivation
//!
//! XML names may contain `-` and `.`, start with digits or collide with
//! Python keywords. Generated class and attribute names go through these
//! helpers; XPath queries keep the raw XML names.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_IDENTIFIER_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").unwrap());

static POSITION_PREDICATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]$").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Upper-case the first character, leaving the rest untouched
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn an arbitrary XML name into a valid Python identifier
pub fn python_identifier(name: &str) -> String {
    let mut ident = NON_IDENTIFIER_CHAR.replace_all(name, "_").into_owned();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_numeric()) {
        ident.insert(0, '_');
    }
    if is_python_keyword(&ident) {
        ident.push('_');
    }
    ident
}

/// Check if a name is a reserved Python keyword
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Class name for a nested object node
pub fn class_name(node_name: &str) -> String {
    python_identifier(&upper_first(node_name))
}

/// Attribute name for a single-valued field
pub fn attribute_name(node_name: &str) -> String {
    python_identifier(node_name)
}

/// Attribute name for a collection field
pub fn collection_attribute_name(node_name: &str) -> String {
    python_identifier(&format!("{}s", node_name))
}

/// Drop a trailing `[n]` predicate so a query selects every repeated sibling
pub fn strip_position(segment: &str) -> &str {
    match POSITION_PREDICATE.find(segment) {
        Some(m) => &segment[..m.start()],
        None => segment,
    }
}

/// Single-line form of an observed value, used in trailing comments
pub fn comment_text(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}
