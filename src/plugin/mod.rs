// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Build step orchestration
//!
//! [`Plugin::exec`] drives the step from start to finish:
//!
//! 1. start the Docker daemon in the background,
//! 2. poll `docker info` until the daemon answers,
//! 3. log into the registry (skipped in dry-run mode),
//! 4. run the command pipeline.
//!
//! There is no way back to an earlier phase; the first fatal error ends
//! the step.

mod login;
mod readiness;

pub use login::authenticate;
pub use readiness::wait_for_daemon;

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Settings, Toolchain};
use crate::daemon::start_daemon;
use crate::errors::StepResult;
use crate::pipeline::{Pipeline, PipelineExecutor, PipelineReport};
use crate::runner::{CommandRunner, SystemRunner};

/// The build step
pub struct Plugin {
    settings: Settings,
    toolchain: Toolchain,
    runner: Arc<dyn CommandRunner>,
}

impl Plugin {
    /// Create a plugin that runs real processes
    pub fn new(settings: Settings, toolchain: Toolchain) -> Self {
        Self::with_runner(settings, toolchain, Arc::new(SystemRunner::new()))
    }

    /// Create a plugin with a custom runner
    pub fn with_runner(
        settings: Settings,
        toolchain: Toolchain,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            toolchain,
            runner,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// The pipeline `exec` would run after login
    pub fn plan(&self) -> Pipeline {
        Pipeline::assemble(&self.settings, &self.toolchain)
    }

    /// Execute the plugin step
    pub async fn exec(&self) -> StepResult<PipelineReport> {
        let build = &self.settings.build;
        debug!(
            tag = %build.name,
            edition = %build.edition,
            remote = build.remote.as_deref().unwrap_or_default(),
            commit_ref = build.commit_ref.as_deref().unwrap_or_default(),
            dry_run = self.settings.dry_run,
            cleanup = self.settings.cleanup,
            "Starting Docker build step"
        );

        // Not awaited: a daemon that fails to start shows up as a poll timeout
        drop(start_daemon(
            Arc::clone(&self.runner),
            &self.toolchain,
            &self.settings.daemon,
        ));

        let attempt = wait_for_daemon(self.runner.as_ref(), &self.toolchain).await?;
        info!(attempt, "Docker daemon is ready");

        if self.settings.dry_run {
            info!("Dry run, skipping registry login");
        } else {
            authenticate(self.runner.as_ref(), &self.toolchain, &self.settings.login).await?;
        }

        PipelineExecutor::new(Arc::clone(&self.runner))
            .execute(self.plan())
            .await
    }
}
