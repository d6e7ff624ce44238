//! Path-template grammar validation, normalization and placeholder extraction

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostic;
use crate::idents;
use crate::symbols::SourceRef;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid regex"));

/// Placeholder names extracted from a path template, partitioned so that a
/// lingering duplicate can never silently pass downstream matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderSet {
    /// Valid-identifier names occurring exactly once, in first-occurrence
    /// order.
    pub usable: Vec<String>,
    pub invalid: Vec<String>,
    pub duplicates: Vec<String>,
}

/// Checks the raw path template against the path grammar. Each violated rule
/// is reported independently; nothing short-circuits.
pub fn validate_path_template(path: &str, origin: &SourceRef) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    let mut report = |message: String| {
        errors.push(Diagnostic::error(message).at(origin.clone()));
    };

    if !path.starts_with('/') {
        report(format!("path template '{path}' must start with '/'"));
    }
    for forbidden in ['?', '&', '#'] {
        if path.contains(forbidden) {
            report(format!(
                "path template '{path}' must not contain '{forbidden}'; declare @Query properties instead"
            ));
        }
    }
    if path.contains("//") {
        report(format!("path template '{path}' contains an empty segment ('//')"));
    }
    if path.contains("{}") {
        report(format!("path template '{path}' contains an empty placeholder ('{{}}')"));
    }

    // One scan covers nested, reversed and unclosed braces.
    let mut depth = 0usize;
    let mut nested = false;
    let mut reversed = false;
    for ch in path.chars() {
        match ch {
            '{' => {
                if depth > 0 {
                    nested = true;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    reversed = true;
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
    }
    if nested {
        report(format!("path template '{path}' contains a nested '{{' placeholder"));
    }
    if reversed {
        report(format!("path template '{path}' contains a '}}' with no matching '{{'"));
    }
    if depth > 0 {
        report(format!("path template '{path}' contains an unclosed '{{'"));
    }

    errors
}

/// Strips a trailing slash (root `/` excepted), warning when it does.
pub fn normalize_path(path: &str, origin: &SourceRef) -> (String, Option<Diagnostic>) {
    if path.len() > 1 && path.ends_with('/') {
        let normalized = path.trim_end_matches('/').to_string();
        let warning = Diagnostic::warning(format!(
            "path template '{path}' has a trailing slash; normalized to '{normalized}'"
        ))
        .at(origin.clone());
        (normalized, Some(warning))
    } else {
        (path.to_string(), None)
    }
}

/// Extracts `{name}` placeholders from a normalized path.
pub fn extract_placeholders(path: &str) -> PlaceholderSet {
    let mut seen: Vec<String> = Vec::new();
    for capture in PLACEHOLDER_RE.captures_iter(path) {
        seen.push(capture[1].to_string());
    }

    let mut set = PlaceholderSet::default();
    for name in &seen {
        if !idents::is_valid_identifier(name) {
            if !set.invalid.contains(name) {
                set.invalid.push(name.clone());
            }
        } else if seen.iter().filter(|n| *n == name).count() > 1 {
            if !set.duplicates.contains(name) {
                set.duplicates.push(name.clone());
            }
        } else {
            set.usable.push(name.clone());
        }
    }
    set
}
