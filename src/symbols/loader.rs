//! File-based universe snapshot loader
//!
//! This loader handles only file I/O; parsing is done by
//! [`InMemoryUniverse::from_snapshot`].

use async_trait::async_trait;
use tokio::fs;

use crate::application::ApplicationError;
use crate::symbols::universe::InMemoryUniverse;

/// Loads a symbol-universe snapshot from some source.
#[async_trait]
pub trait UniverseLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<InMemoryUniverse, ApplicationError>;
}

/// Loads universe snapshots from local JSON files.
pub struct FileUniverseLoader;

impl FileUniverseLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UniverseLoader for FileUniverseLoader {
    async fn load(&self, source: &str) -> Result<InMemoryUniverse, ApplicationError> {
        let content = fs::read_to_string(source)
            .await
            .map_err(ApplicationError::Io)?;

        let universe = InMemoryUniverse::from_snapshot(&content)?;
        tracing::debug!(
            "loaded universe snapshot from {source} with {} declarations",
            universe.len()
        );
        Ok(universe)
    }
}

impl Default for FileUniverseLoader {
    fn default() -> Self {
        Self::new()
    }
}
