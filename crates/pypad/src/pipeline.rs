//! Execution of one code submission, from readiness check to fragment.

use std::sync::Arc;
use std::time::Instant;

use crate::bootstrap::Bootstrapper;
use crate::capture::{ExecutionResult, OutputCapture};
use crate::config::SessionConfig;
use crate::error::Fault;
use crate::plot::PlotAdapter;
use crate::runtime::RuntimeLoader;
use crate::transcript::Transcript;

/// Runs submissions against the runtime and turns every outcome, faults
/// included, into an [`ExecutionResult`].
#[derive(Debug)]
pub struct ExecutionPipeline {
    bootstrapper: Bootstrapper,
    plots: PlotAdapter,
}

impl ExecutionPipeline {
    /// Create a pipeline that loads its runtime through `loader`.
    #[must_use]
    pub fn new(config: &SessionConfig, loader: Arc<dyn RuntimeLoader>) -> Self {
        Self::from_parts(
            Bootstrapper::new(config.runtime_location.clone(), loader),
            PlotAdapter::new(config),
        )
    }

    /// Create a pipeline from an existing bootstrapper and plot adapter.
    #[must_use]
    pub const fn from_parts(bootstrapper: Bootstrapper, plots: PlotAdapter) -> Self {
        Self {
            bootstrapper,
            plots,
        }
    }

    /// The runtime bootstrapper.
    #[must_use]
    pub fn bootstrapper(&self) -> &Bootstrapper {
        &self.bootstrapper
    }

    /// The plot redirection adapter.
    #[must_use]
    pub fn plots(&self) -> &PlotAdapter {
        &self.plots
    }

    /// Run `code` and return its transcript fragment.
    ///
    /// Never fails: a runtime that is not ready, an unresolvable import and
    /// an exception raised by the code all come back as a fault inside the
    /// result. Render targets for plotting code are attached to
    /// `transcript`.
    pub async fn run(&self, code: &str, transcript: &mut Transcript) -> ExecutionResult {
        if !self.bootstrapper.ensure_ready().await.is_ready() {
            tracing::debug!("Submission rejected: runtime not loaded");
            return ExecutionResult::from_fault(Fault::NotLoaded);
        }
        let Some(handle) = self.bootstrapper.handle() else {
            return ExecutionResult::from_fault(Fault::NotLoaded);
        };
        let runtime = handle.runtime();

        let start = Instant::now();
        let prepared = self.plots.prepare(code, transcript);
        let to_run = prepared.code();

        let result = OutputCapture::with_capture(runtime, || async move {
            runtime
                .resolve_imports(to_run)
                .await
                .map_err(Fault::Dependency)?;
            runtime.evaluate(to_run).await.map_err(Fault::Evaluation)
        })
        .await;

        prepared.finish(transcript);

        tracing::debug!(
            code_len = code.len(),
            chunks = result.output().len(),
            has_value = result.value().is_some(),
            fault = ?result.fault(),
            duration = ?start.elapsed(),
            "Execution finished"
        );

        result
    }
}
