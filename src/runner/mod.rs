// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Command runners
//!
//! This module provides the runner trait used at the process boundary and
//! the implementation that spawns real processes.

#[cfg(test)]
pub(crate) mod recording;
mod system;

pub use system::SystemRunner;

use async_trait::async_trait;
use std::time::Duration;

use crate::command::CommandSpec;
use crate::errors::StepError;

/// Result of running one command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the process exited with status zero
    pub success: bool,

    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output and standard error, interleaved in arrival order
    pub output: String,

    /// Wall time until exit
    pub duration: Duration,
}

impl CommandOutput {
    /// Create a successful result
    pub fn success(output: String, duration: Duration) -> Self {
        Self {
            success: true,
            exit_code: 0,
            output,
            duration,
        }
    }

    /// Create a failed result
    pub fn failure(output: String, exit_code: i32, duration: Duration) -> Self {
        Self {
            success: false,
            exit_code,
            output,
            duration,
        }
    }
}

/// Runs external commands
///
/// `Err` means the process could not be started at all; a process that ran
/// and exited non-zero is reported as `Ok` with `success == false`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StepError>;
}
