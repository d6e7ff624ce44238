//! Symbol universe - the read-only oracle over annotated declarations
//!
//! The hosting compiler's symbol table is abstracted behind the
//! [`SymbolUniverse`] trait so the validation and generation core can be
//! exercised against an in-memory universe instead of a real frontend.

pub mod loader;
pub mod markers;
pub mod types;
pub mod universe;

pub use loader::*;
pub use types::*;
pub use universe::*;
