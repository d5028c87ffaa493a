// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Step configuration
//!
//! An immutable snapshot of everything the step needs, built once by the
//! front-end from CLI flags and the CI environment.

mod toolchain;

pub use toolchain::{
    PollPolicy, Toolchain, DEFAULT_BUILDER_PATH, DEFAULT_DOCKERD_PATH, DEFAULT_DOCKER_PATH,
};

use std::path::PathBuf;

/// Default build tag when no commit SHA is available
pub const DEFAULT_COMMIT_SHA: &str = "00000000";

/// Default daemon socket
pub const DEFAULT_DAEMON_HOST: &str = "unix:///var/run/docker.sock";

/// Registry login parameters
#[derive(Clone, Default)]
pub struct Login {
    /// Registry username
    pub username: String,
    /// Registry password
    pub password: String,
}

impl Login {
    /// Names of the credentials that are empty
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

// Hand-written so the password never reaches a log line through `{:?}`.
impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_empty() { "" } else { crate::errors::REDACTED },
            )
            .finish()
    }
}

/// Image build parameters
#[derive(Debug, Clone)]
pub struct Build {
    /// Edition passed to the build helper
    pub edition: String,
    /// Build the Ubuntu variant as well
    pub ubuntu: bool,
    /// Directory every pipeline command runs in
    pub directory: Option<PathBuf>,
    /// Git remote URL
    pub remote: Option<String>,
    /// Git commit ref
    pub commit_ref: Option<String>,
    /// Image tag removed during cleanup (the commit SHA by default)
    pub name: String,
    /// Squash layers at build time
    pub squash: bool,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            edition: "oss".to_string(),
            ubuntu: false,
            directory: None,
            remote: None,
            commit_ref: None,
            name: DEFAULT_COMMIT_SHA.to_string(),
            squash: false,
        }
    }
}

/// Docker daemon parameters
#[derive(Debug, Clone)]
pub struct Daemon {
    /// Socket the daemon binds to
    pub host: String,
    /// Enable experimental features (needed for manifests)
    pub experimental: bool,
}

impl Default for Daemon {
    fn default() -> Self {
        Self {
            host: DEFAULT_DAEMON_HOST.to_string(),
            experimental: true,
        }
    }
}

/// Complete step settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Registry login
    pub login: Login,
    /// Image build
    pub build: Build,
    /// Daemon startup
    pub daemon: Daemon,
    /// Skip registry login (and therefore any push)
    pub dry_run: bool,
    /// Remove the built image and prune the engine afterwards
    pub cleanup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            login: Login::default(),
            build: Build::default(),
            daemon: Daemon::default(),
            dry_run: false,
            cleanup: true,
        }
    }
}
