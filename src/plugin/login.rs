// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Registry authentication

use tracing::{error, info};

use crate::command;
use crate::config::{Login, Toolchain};
use crate::errors::{redacted_environment, StepError, StepResult};
use crate::runner::CommandRunner;

/// Log into the registry with `docker login`
///
/// Both credentials must be set; an empty one fails before anything runs.
pub async fn authenticate(
    runner: &dyn CommandRunner,
    toolchain: &Toolchain,
    login: &Login,
) -> StepResult<()> {
    let missing = login.missing();
    if !missing.is_empty() {
        error!(
            missing = ?missing,
            environment = %redacted_environment(std::env::vars()),
            "Username or password not in environment"
        );
        return Err(StepError::MissingCredentials { missing });
    }

    info!(username = %login.username, "Logging into Docker registry");
    let cmd = command::docker_login(toolchain, login);
    let output = runner.run(&cmd).await?;

    if !output.success {
        error!(exit_code = output.exit_code, "Failed logging into Docker registry");
        return Err(StepError::LoginFailed {
            exit_code: output.exit_code,
            output: output.output,
        });
    }

    info!("Successfully logged into Docker registry");
    Ok(())
}
