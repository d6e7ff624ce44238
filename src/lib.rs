//! clientsmith library
//!
//! Validates declaratively-annotated request-model declarations and generates
//! typed HTTP client code plus companion test harnesses. The core is a
//! synchronous, side-effect-free pipeline: discover specs, validate them,
//! validate the request models under each spec's scan packages, cross-check
//! the batch, and (only if the whole batch is error-free) emit source files.
#![deny(unsafe_code)]

pub mod application;
pub mod descriptors;
pub mod diagnostics;
pub mod generation;
pub mod idents;
pub mod output;
pub mod pipeline;
pub mod symbols;
pub mod validation;
