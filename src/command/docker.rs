// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Docker, dockerd and build helper command builders

use super::{CommandKind, CommandSpec};
use crate::config::{Build, Daemon, Login, Toolchain};

/// Trailing daemon log lines kept for the failure report
const DAEMON_OUTPUT_LINES: usize = 50;

/// `dockerd --host=<socket> [--experimental]`
pub fn daemon(toolchain: &Toolchain, daemon: &Daemon) -> CommandSpec {
    let cmd = CommandSpec::new(CommandKind::Daemon, &toolchain.dockerd)
        .arg(format!("--host={}", daemon.host))
        .keep_last_lines(DAEMON_OUTPUT_LINES);

    // Required for making manifests
    if daemon.experimental {
        cmd.arg("--experimental")
    } else {
        cmd
    }
}

/// `docker info`, used to check whether the daemon answers yet
pub fn readiness_probe(toolchain: &Toolchain) -> CommandSpec {
    CommandSpec::new(CommandKind::Probe, &toolchain.docker).arg("info")
}

/// `docker login -u <user> -p <password>`
pub fn docker_login(toolchain: &Toolchain, login: &Login) -> CommandSpec {
    CommandSpec::new(CommandKind::Login, &toolchain.docker)
        .arg("login")
        .args(["-u", login.username.as_str()])
        .arg("-p")
        .sensitive_arg(login.password.as_str())
}

pub fn docker_version(toolchain: &Toolchain) -> CommandSpec {
    CommandSpec::new(CommandKind::Version, &toolchain.docker).arg("version")
}

pub fn docker_info(toolchain: &Toolchain) -> CommandSpec {
    CommandSpec::new(CommandKind::Info, &toolchain.docker).arg("info")
}

/// `<builder> build-docker --edition <edition> [--ubuntu] [--squash]`
pub fn build_image(toolchain: &Toolchain, build: &Build) -> CommandSpec {
    let mut cmd = CommandSpec::new(CommandKind::Build, &toolchain.builder)
        .arg("build-docker")
        .args(["--edition", build.edition.as_str()]);

    if build.ubuntu {
        cmd = cmd.arg("--ubuntu");
    }
    if build.squash {
        cmd = cmd.arg("--squash");
    }

    cmd
}

pub fn docker_rmi(toolchain: &Toolchain, tag: &str) -> CommandSpec {
    CommandSpec::new(CommandKind::RemoveImage, &toolchain.docker).args(["rmi", tag])
}

pub fn docker_prune(toolchain: &Toolchain) -> CommandSpec {
    CommandSpec::new(CommandKind::Prune, &toolchain.docker).args(["system", "prune", "-f"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_flags() {
        let cmd = daemon(&Toolchain::default(), &Daemon::default());
        assert_eq!(cmd.kind(), CommandKind::Daemon);
        assert_eq!(
            cmd.to_string(),
            "/usr/local/bin/dockerd --host=unix:///var/run/docker.sock --experimental"
        );

        let plain = Daemon {
            host: "tcp://0.0.0.0:2375".into(),
            experimental: false,
        };
        assert_eq!(
            daemon(&Toolchain::default(), &plain).arguments(),
            &["--host=tcp://0.0.0.0:2375".to_string()]
        );
    }

    #[test]
    fn test_build_flags() {
        let toolchain = Toolchain::default();
        let mut build = Build::default();
        assert_eq!(
            build_image(&toolchain, &build).to_string(),
            "./bin/grabpl build-docker --edition oss"
        );

        build.edition = "enterprise".into();
        build.ubuntu = true;
        build.squash = true;
        assert_eq!(
            build_image(&toolchain, &build).to_string(),
            "./bin/grabpl build-docker --edition enterprise --ubuntu --squash"
        );
    }

    #[test]
    fn test_cleanup_commands() {
        let toolchain = Toolchain::default();
        assert_eq!(
            docker_rmi(&toolchain, "myimg:tag").arguments(),
            &["rmi".to_string(), "myimg:tag".to_string()]
        );
        assert_eq!(
            docker_prune(&toolchain).to_string(),
            "/usr/local/bin/docker system prune -f"
        );
    }

    #[test]
    fn test_daemon_output_is_bounded() {
        let cmd = daemon(&Toolchain::default(), &Daemon::default());
        assert_eq!(cmd.output_limit(), Some(DAEMON_OUTPUT_LINES));
        assert_eq!(docker_version(&Toolchain::default()).output_limit(), None);
    }

    #[test]
    fn test_probe_is_info() {
        let probe = readiness_probe(&Toolchain::default());
        assert_eq!(probe.kind(), CommandKind::Probe);
        assert_eq!(probe.arguments(), docker_info(&Toolchain::default()).arguments());
    }
}
