// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Pipeline executor
//!
//! Runs pipeline commands one after another. A failing `rmi` or `prune` is
//! logged and skipped; any other failure aborts the pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::Pipeline;
use crate::command::{CommandKind, CommandSpec};
use crate::errors::{StepError, StepResult};
use crate::runner::{CommandOutput, CommandRunner};

/// How a pipeline command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// Failed, but the failure is ignored
    Tolerated,
}

/// One executed command
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub kind: CommandKind,
    /// Redacted command line
    pub command: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

/// Result of a pipeline that ran to the end
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Executed commands, in order
    pub steps: Vec<StepRecord>,
    /// Total execution time
    pub duration: Duration,
}

impl PipelineReport {
    /// Number of failures that were ignored
    pub fn tolerated(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Tolerated)
            .count()
    }
}

/// Why a command did not succeed
enum Failure {
    Exited(CommandOutput),
    NotStarted(StepError),
}

impl Failure {
    fn into_error(self, cmd: &CommandSpec) -> StepError {
        match self {
            Self::Exited(output) => StepError::CommandFailed {
                command: cmd.to_string(),
                exit_code: output.exit_code,
                output: output.output,
            },
            Self::NotStarted(e) => e,
        }
    }

    fn duration(&self) -> Duration {
        match self {
            Self::Exited(output) => output.duration,
            Self::NotStarted(_) => Duration::ZERO,
        }
    }
}

/// Pipeline executor
pub struct PipelineExecutor {
    runner: Arc<dyn CommandRunner>,
}

impl PipelineExecutor {
    /// Create a new pipeline executor
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Execute a pipeline
    ///
    /// Each command starts only after the previous one has exited.
    pub async fn execute(&self, pipeline: Pipeline) -> StepResult<PipelineReport> {
        let start = Instant::now();
        let mut steps = Vec::with_capacity(pipeline.len());

        for cmd in pipeline {
            debug!(kind = %cmd.kind(), command = %cmd, "Executing");

            let failure = match self.runner.run(&cmd).await {
                Ok(output) if output.success => {
                    steps.push(StepRecord {
                        kind: cmd.kind(),
                        command: cmd.to_string(),
                        outcome: StepOutcome::Succeeded,
                        duration: output.duration,
                    });
                    continue;
                }
                Ok(output) => Failure::Exited(output),
                Err(e) => Failure::NotStarted(e),
            };

            if !cmd.kind().is_best_effort() {
                return Err(failure.into_error(&cmd));
            }

            match cmd.kind() {
                CommandKind::Prune => {
                    warn!("Could not prune system containers. Ignoring...");
                }
                CommandKind::RemoveImage => {
                    let tag = cmd.arguments().get(1).map(String::as_str).unwrap_or_default();
                    warn!(tag, "Could not remove image {:?}. Ignoring...", tag);
                }
                kind => warn!(%kind, "Could not run {}. Ignoring...", kind),
            }

            steps.push(StepRecord {
                kind: cmd.kind(),
                command: cmd.to_string(),
                outcome: StepOutcome::Tolerated,
                duration: failure.duration(),
            });
        }

        let report = PipelineReport {
            steps,
            duration: start.elapsed(),
        };

        info!(
            commands = report.steps.len(),
            ignored_failures = report.tolerated(),
            "Pipeline completed in {:.2}s",
            report.duration.as_secs_f64()
        );

        Ok(report)
    }
}
