// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Daemon readiness polling

use tokio::time::sleep;
use tracing::debug;

use crate::command;
use crate::config::Toolchain;
use crate::errors::{StepError, StepResult};
use crate::runner::CommandRunner;

/// Probe the daemon until it answers
///
/// Returns the 1-based attempt that succeeded. Sleeps `interval` between
/// attempts, never after the last one.
pub async fn wait_for_daemon(
    runner: &dyn CommandRunner,
    toolchain: &Toolchain,
) -> StepResult<u32> {
    let policy = toolchain.poll;

    for attempt in 1..=policy.max_attempts {
        debug!(
            attempt,
            max_attempts = policy.max_attempts,
            "Polling Docker daemon to see if it's ready"
        );

        let probe = command::readiness_probe(toolchain);
        match runner.run(&probe).await {
            Ok(output) if output.success => return Ok(attempt),
            Ok(output) => debug!(exit_code = output.exit_code, "Docker daemon not ready"),
            Err(e) => debug!(error = %e, "Docker daemon probe could not run"),
        }

        if attempt < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }

    Err(StepError::DaemonTimeout {
        attempts: policy.max_attempts,
    })
}
