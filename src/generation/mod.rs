//! Code generation - pure transformation from validated descriptors to
//! Kotlin source artifacts
//!
//! Generation is deterministic: requests keep their discovery order, groups
//! their first-seen order, so regenerating from the same universe produces
//! byte-identical output.

pub mod client;
pub mod harness;
pub mod writer;

pub use client::*;
pub use harness::*;
pub use writer::*;

use std::path::PathBuf;

use crate::descriptors::{RequestDescriptor, SpecDescriptor};

/// One generated source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    /// Places a file under the directory tree of `package`.
    pub fn in_package(package: &str, file_name: &str, content: String) -> Self {
        let mut path: PathBuf = package.split('.').collect();
        path.push(file_name);
        Self { path, content }
    }
}

/// Generates every artifact for one spec: client class(es), an aggregator
/// under ByPrefix, and the test harness when enabled.
pub fn generate_spec(spec: &SpecDescriptor, requests: &[RequestDescriptor]) -> Vec<Artifact> {
    let mut artifacts = client::generate_clients(spec, requests);
    if spec.generate_harness {
        artifacts.push(harness::generate_harness(spec));
    }
    artifacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_in_package() {
        let artifact = Artifact::in_package("com.example.client", "PetClient.kt", String::new());
        assert_eq!(
            artifact.path,
            PathBuf::from("com/example/client/PetClient.kt")
        );
    }
}
