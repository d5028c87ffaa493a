// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Docker daemon launcher
//!
//! The daemon runs on a detached task for the lifetime of the step. Its
//! failures are only logged: the caller learns about a dead daemon from the
//! readiness poll, never from this module.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::command;
use crate::config::{Daemon, Toolchain};
use crate::runner::CommandRunner;

/// Start the Docker daemon in the background and return immediately
///
/// The returned handle may be dropped; dropping it does not stop the daemon.
pub fn start_daemon(
    runner: Arc<dyn CommandRunner>,
    toolchain: &Toolchain,
    daemon: &Daemon,
) -> JoinHandle<()> {
    let cmd = command::daemon(toolchain, daemon);

    tokio::spawn(async move {
        debug!(command = %cmd, "Starting Docker daemon");

        match runner.run(&cmd).await {
            Ok(output) if output.success => {
                debug!(output = %output.output, "Docker daemon exited");
            }
            Ok(output) => {
                error!(
                    exit_code = output.exit_code,
                    output = %output.output,
                    "Docker daemon failed"
                );
            }
            Err(e) => {
                error!(error = %e, "Docker daemon failed");
            }
        }
    })
}
