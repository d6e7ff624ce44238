//! Client generation use case
//!
//! Wires the loader, the validation/generation pipeline and the output sink
//! together. All diagnostics are logged here; callers only see the summary.

use std::sync::Arc;

use crate::application::errors::ApplicationError;
use crate::output::OutputSink;
use crate::pipeline;
use crate::symbols::UniverseLoader;

/// Summary of one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of artifacts written (zero under `--check` or on failure).
    pub written: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Loads a universe snapshot, runs the pipeline and writes the artifacts.
pub struct GenerateClientsUseCase {
    loader: Arc<dyn UniverseLoader>,
    output: Arc<dyn OutputSink>,
}

impl GenerateClientsUseCase {
    pub fn new(loader: Arc<dyn UniverseLoader>, output: Arc<dyn OutputSink>) -> Self {
        Self { loader, output }
    }

    /// Runs the pipeline against the snapshot at `universe_path`. With
    /// `dry_run` set, validation runs in full but nothing is written.
    ///
    /// Returns [`ApplicationError::Validation`] when any error diagnostic was
    /// raised; warnings alone never fail the run.
    pub async fn execute(
        &self,
        universe_path: &str,
        dry_run: bool,
    ) -> Result<GenerateReport, ApplicationError> {
        let universe = self.loader.load(universe_path).await?;
        tracing::info!("validating {} declaration(s)", universe.len());

        let outcome = pipeline::run(&universe);
        for diagnostic in &outcome.diagnostics.warnings {
            tracing::warn!("{diagnostic}");
        }
        for diagnostic in &outcome.diagnostics.errors {
            tracing::error!("{diagnostic}");
        }

        let errors = outcome.diagnostics.errors.len();
        let warnings = outcome.diagnostics.warnings.len();
        if errors > 0 {
            return Err(ApplicationError::Validation(errors));
        }

        let written = if dry_run {
            tracing::info!(
                "check passed: {} artifact(s) would be written",
                outcome.artifacts.len()
            );
            0
        } else {
            self.output.write_artifacts(&outcome.artifacts).await?;
            tracing::info!("wrote {} artifact(s)", outcome.artifacts.len());
            outcome.artifacts.len()
        };

        Ok(GenerateReport {
            written,
            errors,
            warnings,
        })
    }
}
