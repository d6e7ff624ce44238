//! Output sinks for generated artifacts

pub mod filesystem;

use async_trait::async_trait;

use crate::application::ApplicationError;
use crate::generation::Artifact;

pub use filesystem::FileSystemOutputSink;

/// Destination for generated artifacts.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError>;
}
