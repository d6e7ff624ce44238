//! Declaration model mirrored from the hosting compiler's symbol table
//!
//! Everything here is plain data with serde support so a whole universe can be
//! captured as a JSON snapshot and replayed through the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Points a diagnostic back at the declaration (and optionally the property)
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub declaration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl SourceRef {
    pub fn declaration(name: impl Into<String>) -> Self {
        Self {
            declaration: name.into(),
            property: None,
        }
    }

    pub fn property(declaration: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            property: Some(property.into()),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{}.{}", self.declaration, property),
            None => write!(f, "{}", self.declaration),
        }
    }
}

/// Declaration kind as reported by the host compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Singleton declaration (`object`), the required form for a
    /// parameterless marker request.
    Object,
    /// Record-like aggregate (`data class`), the required form for a request
    /// with properties.
    DataClass,
    Class,
    Interface,
}

/// Modifier flags relevant to validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_inner: bool,
}

/// A single named argument value on an annotation use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    Str(String),
    Bool(bool),
    StrList(Vec<String>),
    /// A class reference argument, by qualified name.
    Type(String),
    /// An enum entry argument, by entry name.
    Enum(String),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            AnnotationValue::StrList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&str> {
        match self {
            AnnotationValue::Type(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AnnotationValue::Enum(entry) => Some(entry),
            _ => None,
        }
    }
}

/// One use of a marker annotation, with its named arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationUse {
    pub name: String,
    #[serde(default)]
    pub args: BTreeMap<String, AnnotationValue>,
}

impl AnnotationUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    pub fn arg(&self, key: &str) -> Option<&AnnotationValue> {
        self.args.get(key)
    }
}

/// A type reference with nullability and one level of generic arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Qualified name, e.g. `kotlin.Int` or `kotlin.collections.List`.
    pub name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            args: Vec::new(),
        }
    }

    pub fn nullable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: TypeRef) -> Self {
        self.args.push(arg);
        self
    }

    /// Name after the last `.`, e.g. `Int` for `kotlin.Int`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A declared property of a request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: TypeRef,
    /// `var` vs `val` in the source declaration.
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable: false,
            annotations: Vec::new(),
        }
    }

    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a.name == marker)
    }

    pub fn annotation(&self, marker: &str) -> Option<&AnnotationUse> {
        self.annotations.iter().find(|a| a.name == marker)
    }
}

/// A class-like declaration surfaced by the host compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub qualified_name: String,
    pub package: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub annotations: Vec<AnnotationUse>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    /// Primary-constructor parameter name -> whether it declares a default.
    #[serde(default)]
    pub constructor_defaults: BTreeMap<String, bool>,
}

impl ClassDecl {
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a.name == marker)
    }

    pub fn annotation(&self, marker: &str) -> Option<&AnnotationUse> {
        self.annotations.iter().find(|a| a.name == marker)
    }

    /// All annotations whose name is in `markers`, in declaration order.
    pub fn annotations_among<'a>(&'a self, markers: &[&str]) -> Vec<&'a AnnotationUse> {
        self.annotations
            .iter()
            .filter(|a| markers.contains(&a.name.as_str()))
            .collect()
    }

    pub fn has_default(&self, property: &str) -> bool {
        self.constructor_defaults
            .get(property)
            .copied()
            .unwrap_or(false)
    }

    pub fn source_ref(&self) -> SourceRef {
        SourceRef::declaration(self.qualified_name.clone())
    }
}
