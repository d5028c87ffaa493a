// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Executable locations and daemon polling policy

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Docker CLI location inside the plugin image
pub const DEFAULT_DOCKER_PATH: &str = "/usr/local/bin/docker";

/// Default Docker daemon location inside the plugin image
pub const DEFAULT_DOCKERD_PATH: &str = "/usr/local/bin/dockerd";

/// Default build helper location, relative to the build directory
pub const DEFAULT_BUILDER_PATH: &str = "./bin/grabpl";

/// How long to wait for the daemon to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Probe attempts before giving up (at least one)
    pub max_attempts: u32,
    /// Pause between two attempts
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 15,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    /// Upper bound on the time spent sleeping between probes
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// External programs the step drives
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Docker CLI
    pub docker: PathBuf,
    /// Docker daemon
    pub dockerd: PathBuf,
    /// Image build helper
    pub builder: PathBuf,
    /// Daemon readiness polling
    pub poll: PollPolicy,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            docker: PathBuf::from(DEFAULT_DOCKER_PATH),
            dockerd: PathBuf::from(DEFAULT_DOCKERD_PATH),
            builder: PathBuf::from(DEFAULT_BUILDER_PATH),
            poll: PollPolicy::default(),
        }
    }
}

impl Toolchain {
    /// Programs that cannot be found, resolving relative paths against `cwd`
    pub fn missing_tools(&self, cwd: &Path) -> Vec<PathBuf> {
        [&self.docker, &self.dockerd, &self.builder]
            .into_iter()
            .filter(|program| which::which_in(program, std::env::var_os("PATH"), cwd).is_err())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 15);
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.budget(), Duration::from_secs(14));
    }

    #[test]
    fn test_missing_tools_reports_absent_paths() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            docker: dir.path().join("docker"),
            dockerd: dir.path().join("dockerd"),
            builder: PathBuf::from("./bin/grabpl"),
            poll: PollPolicy::default(),
        };

        let missing = toolchain.missing_tools(dir.path());
        assert_eq!(missing.len(), 3);
        assert_eq!(missing[2], PathBuf::from("./bin/grabpl"));
    }
}
