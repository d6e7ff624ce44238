//! Validation pipeline - the compiler front end of the generator
//!
//! Stages, leaf-first: path-template grammar and placeholder extraction,
//! per-property parameter classification, spec-level validation, per-request
//! validation, and cross-request checks over a spec's whole batch. Every
//! stage reports its findings as [`crate::diagnostics::Diagnostic`] values
//! rather than raising errors.

pub mod cross;
pub mod params;
pub mod path;
pub mod request;
pub mod spec;

pub use cross::*;
pub use params::*;
pub use path::*;
pub use request::*;
pub use spec::*;
