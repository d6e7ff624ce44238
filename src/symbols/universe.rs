//! The read-only symbol oracle and its in-memory implementation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbols::types::ClassDecl;

/// Errors raised while materializing a symbol universe.
#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Failed to parse universe snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Read-only query surface over the hosting compiler's symbol table.
///
/// Implementations must answer deterministically: repeated identical queries
/// in one pass return declarations in the same order, which is what makes
/// regeneration byte-identical.
pub trait SymbolUniverse {
    /// All declarations carrying the given marker annotation, in discovery
    /// order.
    fn annotated_with(&self, marker: &str) -> Vec<&ClassDecl>;

    /// All declarations whose package is `package` or a subpackage of it, in
    /// discovery order.
    fn classes_under(&self, package: &str) -> Vec<&ClassDecl>;

    /// Resolve a qualified name to its declaration, if it exists.
    fn resolve(&self, qualified_name: &str) -> Option<&ClassDecl>;
}

/// Insertion-ordered universe used both as the snapshot deserialization
/// target and as the test fake.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryUniverse {
    classes: Vec<ClassDecl>,
}

impl InMemoryUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_classes(classes: Vec<ClassDecl>) -> Self {
        Self { classes }
    }

    /// Parse a universe snapshot, the JSON document produced by the host-side
    /// exporter.
    pub fn from_snapshot(json: &str) -> Result<Self, SymbolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add(&mut self, decl: ClassDecl) {
        self.classes.push(decl);
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SymbolUniverse for InMemoryUniverse {
    fn annotated_with(&self, marker: &str) -> Vec<&ClassDecl> {
        self.classes
            .iter()
            .filter(|c| c.has_annotation(marker))
            .collect()
    }

    fn classes_under(&self, package: &str) -> Vec<&ClassDecl> {
        self.classes
            .iter()
            .filter(|c| {
                c.package == package
                    || c.package
                        .strip_prefix(package)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .collect()
    }

    fn resolve(&self, qualified_name: &str) -> Option<&ClassDecl> {
        self.classes
            .iter()
            .find(|c| c.qualified_name == qualified_name)
    }
}
