// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Error types for the build step
//!
//! Every error here is fatal for the step. Best-effort cleanup failures
//! (image removal, system prune) never become a `StepError`; they are
//! logged as warnings by the pipeline executor instead.

mod redact;

pub use redact::{redacted_environment, REDACTED};

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for build step operations
pub type StepResult<T> = Result<T, StepError>;

/// Main error type for the build step
#[derive(Error, Debug, Diagnostic)]
pub enum StepError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("registry credentials must be provided")]
    #[diagnostic(
        code(docker_build_step::missing_credentials),
        help("Set PLUGIN_USERNAME and PLUGIN_PASSWORD (or DOCKER_USERNAME and DOCKER_PASSWORD), or enable dry-run")
    )]
    MissingCredentials {
        /// Names of the settings that were empty
        missing: Vec<&'static str>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Daemon Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("docker daemon didn't come up on time")]
    #[diagnostic(
        code(docker_build_step::daemon_timeout),
        help("The daemon did not answer `docker info` after {attempts} attempts. Check that the step runs privileged.")
    )]
    DaemonTimeout { attempts: u32 },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("error authenticating: exit code {exit_code}\n{output}")]
    #[diagnostic(code(docker_build_step::login_failed))]
    LoginFailed { exit_code: i32, output: String },

    #[error("command failed: {command} (exit code {exit_code})\n{output}")]
    #[diagnostic(code(docker_build_step::command_failed))]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("failed to start '{}': {error}", .program.display())]
    #[diagnostic(code(docker_build_step::spawn_failed))]
    Spawn {
        program: PathBuf,
        error: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(docker_build_step::io_error))]
    Io { message: String },

    #[error("JSON serialization error: {message}")]
    #[diagnostic(code(docker_build_step::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for StepError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_json::Error> for StepError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl StepError {
    /// Create a spawn error, with a hint when the executable is missing
    pub fn spawn(program: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let program = program.into();
        let help = match error.kind() {
            std::io::ErrorKind::NotFound => Some(format!(
                "'{}' does not exist in this image. Override the path with the matching --*-path option.",
                program.display()
            )),
            std::io::ErrorKind::PermissionDenied => {
                Some(format!("'{}' is not executable", program.display()))
            }
            _ => None,
        };

        Self::Spawn {
            program,
            error: error.to_string(),
            help,
        }
    }
}
