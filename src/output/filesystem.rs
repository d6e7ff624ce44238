//! Filesystem-based output sink

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ApplicationError;
use crate::generation::Artifact;
use crate::output::OutputSink;

/// Writes artifacts under a root directory, resolving each artifact's
/// package-relative path against it.
pub struct FileSystemOutputSink {
    root: PathBuf,
}

impl FileSystemOutputSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl OutputSink for FileSystemOutputSink {
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<(), ApplicationError> {
        for artifact in artifacts {
            let target = self.root.join(&artifact.path);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ApplicationError::Output(format!(
                        "failed to create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }

            let mut file = fs::File::create(&target).await.map_err(|e| {
                ApplicationError::Output(format!(
                    "failed to create file {}: {e}",
                    target.display()
                ))
            })?;

            file.write_all(artifact.content.as_bytes())
                .await
                .map_err(|e| {
                    ApplicationError::Output(format!(
                        "failed to write file {}: {e}",
                        target.display()
                    ))
                })?;

            file.flush().await.map_err(|e| {
                ApplicationError::Output(format!(
                    "failed to flush file {}: {e}",
                    target.display()
                ))
            })?;

            tracing::debug!("wrote {}", target.display());
        }

        Ok(())
    }
}
