//! Diagnostics and the validation result type threaded through every stage
//!
//! Validators report their findings as data instead of raising errors: each
//! stage returns a [`ValidationResult`] (or a bare [`Diagnostics`] buffer) and
//! the parent merges child diagnostics before deciding whether to continue.
//! Warnings are advisory and never block generation; any error anywhere in the
//! batch suppresses generation for the whole batch.

use serde::Serialize;
use std::fmt;

use crate::symbols::SourceRef;

/// Diagnostic severity. Errors suppress generation, warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation finding, optionally pointing at its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<SourceRef>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            origin: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            origin: None,
        }
    }

    pub fn at(mut self, origin: SourceRef) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}: {} [{}]", self.severity, self.message, origin),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Accumulator partitioning findings by severity.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn extend_from(&mut self, findings: Vec<Diagnostic>) {
        for diagnostic in findings {
            self.push(diagnostic);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// All findings, errors first.
    pub fn into_all(self) -> Vec<Diagnostic> {
        let mut all = self.errors;
        all.extend(self.warnings);
        all
    }
}

/// Sum type carrying either a validated value or the errors that prevented
/// one, with advisory warnings on both sides.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Valid {
        value: T,
        warnings: Vec<Diagnostic>,
    },
    Invalid {
        errors: Vec<Diagnostic>,
        warnings: Vec<Diagnostic>,
    },
}

impl<T> ValidationResult<T> {
    pub fn valid(value: T) -> Self {
        ValidationResult::Valid {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn valid_with(value: T, warnings: Vec<Diagnostic>) -> Self {
        ValidationResult::Valid { value, warnings }
    }

    pub fn invalid(errors: Vec<Diagnostic>) -> Self {
        ValidationResult::Invalid {
            errors,
            warnings: Vec::new(),
        }
    }

    pub fn invalid_with(errors: Vec<Diagnostic>, warnings: Vec<Diagnostic>) -> Self {
        ValidationResult::Invalid { errors, warnings }
    }

    /// Collapses a merged diagnostics buffer: valid iff it holds no errors.
    pub fn from_diagnostics(value: T, diagnostics: Diagnostics) -> Self {
        if diagnostics.has_errors() {
            ValidationResult::Invalid {
                errors: diagnostics.errors,
                warnings: diagnostics.warnings,
            }
        } else {
            ValidationResult::Valid {
                value,
                warnings: diagnostics.warnings,
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        match self {
            ValidationResult::Valid { warnings, .. } => warnings,
            ValidationResult::Invalid { warnings, .. } => warnings,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            ValidationResult::Valid { value, warnings } => ValidationResult::Valid {
                value: f(value),
                warnings,
            },
            ValidationResult::Invalid { errors, warnings } => {
                ValidationResult::Invalid { errors, warnings }
            }
        }
    }

    /// Drains all findings into `sink` and yields the value when valid.
    pub fn collect_into(self, sink: &mut Diagnostics) -> Option<T> {
        match self {
            ValidationResult::Valid { value, warnings } => {
                sink.warnings.extend(warnings);
                Some(value)
            }
            ValidationResult::Invalid { errors, warnings } => {
                sink.errors.extend(errors);
                sink.warnings.extend(warnings);
                None
            }
        }
    }
}
