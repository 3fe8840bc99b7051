//! Scan-analysis pipeline.
//!
//! A straight line of four stages over one shared [`PipelineState`]:
//! ingest, humanize, risk analysis, solutions. Each generation stage feeds the
//! previous stage's output into its prompt, so stages never run concurrently
//! and are never reordered. Any failure aborts the whole run; nothing here
//! persists anything.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::text_generator::TextGenerator;
use crate::application::prompts;

/// Progress marker. `Pending` is the state before ingest has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    Pending,
    Ingested,
    HumanReadableProduced,
    RiskAnalyzed,
    SolutionsProposed,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Ingest,
    Humanize,
    RiskAnalyze,
    Solve,
}

/// Execution order. Fixed.
pub const STAGES: [Stage; 4] = [Stage::Ingest, Stage::Humanize, Stage::RiskAnalyze, Stage::Solve];

impl Stage {
    /// The state reached once this stage has completed.
    pub fn completes(self) -> PipelineStage {
        match self {
            Stage::Ingest => PipelineStage::Ingested,
            Stage::Humanize => PipelineStage::HumanReadableProduced,
            Stage::RiskAnalyze => PipelineStage::RiskAnalyzed,
            Stage::Solve => PipelineStage::SolutionsProposed,
        }
    }

    async fn apply(
        self,
        state: &mut PipelineState,
        generator: &dyn TextGenerator,
        timeout: Duration,
    ) -> AppResult<()> {
        match self {
            Stage::Ingest => {
                if state.raw_scan_data.is_null() {
                    return Err(AppError::MalformedInput(
                        "Scan report must be a JSON document".into(),
                    ));
                }
            }
            Stage::Humanize => {
                let prompt = prompts::humanize(&state.raw_scan_data);
                state.human_readable = generate(generator, &prompt, timeout, self).await?;
            }
            Stage::RiskAnalyze => {
                let prompt = prompts::risk_analysis(&state.raw_scan_data, &state.human_readable);
                state.risk_analysis = generate(generator, &prompt, timeout, self).await?;
            }
            Stage::Solve => {
                let prompt = prompts::solutions(
                    &state.raw_scan_data,
                    &state.human_readable,
                    &state.risk_analysis,
                );
                state.solutions = generate(generator, &prompt, timeout, self).await?;
            }
        }
        state.stage = self.completes();
        Ok(())
    }
}

async fn generate(
    generator: &dyn TextGenerator,
    prompt: &str,
    timeout: Duration,
    stage: Stage,
) -> AppResult<String> {
    match tokio::time::timeout(timeout, generator.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::GenerationFailed(format!(
            "{stage} stage timed out after {}s",
            timeout.as_secs_f32()
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct PipelineState {
    pub raw_scan_data: Value,
    pub human_readable: String,
    pub risk_analysis: String,
    pub solutions: String,
    pub stage: PipelineStage,
}

impl PipelineState {
    pub fn new(raw_scan_data: Value) -> Self {
        Self {
            raw_scan_data,
            human_readable: String::new(),
            risk_analysis: String::new(),
            solutions: String::new(),
            stage: PipelineStage::Pending,
        }
    }
}

#[derive(Clone)]
pub struct ScanPipeline {
    generator: Arc<dyn TextGenerator>,
    stage_timeout: Duration,
}

impl ScanPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, stage_timeout: Duration) -> Self {
        Self {
            generator,
            stage_timeout,
        }
    }

    /// Run every stage in order. Cancellation is only observed between stages;
    /// a stage whose generation call is in flight always runs to completion or timeout.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        raw_scan_data: Value,
        cancel: &CancellationToken,
    ) -> AppResult<PipelineState> {
        let mut state = PipelineState::new(raw_scan_data);

        for stage in STAGES {
            if cancel.is_cancelled() {
                tracing::info!(%stage, "Pipeline cancelled before stage");
                return Err(AppError::Cancelled);
            }
            if let Err(err) = stage
                .apply(&mut state, self.generator.as_ref(), self.stage_timeout)
                .await
            {
                tracing::warn!(%stage, error = %err, "Pipeline stage failed");
                return Err(err);
            }
            tracing::debug!(%stage, reached = %state.stage, "Pipeline stage completed");
        }

        state.stage = PipelineStage::Done;
        Ok(state)
    }
}
