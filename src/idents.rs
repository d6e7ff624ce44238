//! Identifier and format utilities
//!
//! Pure helpers shared by the validators and the code generator: identifier
//! and keyword checks for the target language, the HTTP header token grammar,
//! name derivation rules, and path-segment extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::symbols::markers;

/// Hard keywords of the target language; these can never be identifiers.
const KEYWORDS: [&str; 28] = [
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Recognized suffixes on API spec declarations, longest first.
const SPEC_SUFFIXES: [&str; 3] = ["ApiSpec", "Spec", "Api"];

static PACKAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
});

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Syntactically valid, non-keyword identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    starts_ok && chars.all(|c| c.is_alphanumeric() || c == '_') && !is_keyword(s)
}

/// HTTP header field-name token grammar per RFC 9110: letters, digits and
/// `!#$%&'*+-.^_`|~`.
pub fn is_valid_header_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
        })
}

/// Dotted package path of identifiers.
pub fn is_valid_package_path(s: &str) -> bool {
    PACKAGE_RE.is_match(s)
}

/// Derives the endpoint function name from a request class simple name:
/// strips the trailing `Request` suffix and lower-cases the first letter.
/// Returns `None` when the suffix is missing or nothing remains after it.
pub fn endpoint_name(simple_name: &str) -> Option<String> {
    let stem = simple_name.strip_suffix(markers::REQUEST_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(decapitalize(stem))
}

/// Derives the client-name prefix from a spec declaration simple name by
/// stripping the first recognized suffix. May yield an empty string, which
/// the spec validator rejects.
pub fn client_prefix(simple_name: &str) -> String {
    for suffix in SPEC_SUFFIXES {
        if let Some(stem) = simple_name.strip_suffix(suffix) {
            return stem.to_string();
        }
    }
    simple_name.to_string()
}

/// First path segment that is not a placeholder, if any.
pub fn first_literal_segment(path: &str) -> Option<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .find(|segment| !segment.starts_with('{'))
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
