// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! CLI definitions and handlers
//!
//! Every option can also come from the environment, which is how Drone
//! hands plugin settings (`PLUGIN_*`) and build metadata (`DRONE_*`) to
//! the step.

pub mod plan;
pub mod run;

use clap::builder::{BoolishValueParser, FalseyValueParser};
use clap::{ArgAction, Args, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    Build, Daemon, Login, PollPolicy, Settings, Toolchain, DEFAULT_BUILDER_PATH,
    DEFAULT_COMMIT_SHA, DEFAULT_DAEMON_HOST, DEFAULT_DOCKERD_PATH, DEFAULT_DOCKER_PATH,
};

/// Docker build step
///
/// Starts a Docker daemon, logs into the registry and builds images.
#[derive(Parser, Debug)]
#[clap(
    name = "docker-build-step",
    version,
    about = "Start a Docker daemon, log into the registry and build images in a CI step",
    long_about = None,
    after_help = "Examples:\n\
        docker-build-step                          Run the step with settings from the environment\n\
        docker-build-step --dry-run                Build without logging into the registry\n\
        docker-build-step --plan --format json     Show the commands the step would run"
)]
pub struct Cli {
    #[clap(flatten)]
    pub args: PluginArgs,

    /// Print the command plan instead of running it
    #[clap(long)]
    pub plan: bool,

    /// Plan output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Text, requires = "plan")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,
}

/// Plugin settings
#[derive(Args, Debug, Clone)]
pub struct PluginArgs {
    /// Dry run disables docker login and push
    #[clap(long = "dry-run", env = "PLUGIN_DRY_RUN", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// Git remote url
    #[clap(long = "remote.url", env = "DRONE_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// Git commit sha, used as the image tag
    #[clap(long = "commit.sha", env = "DRONE_COMMIT_SHA", default_value = DEFAULT_COMMIT_SHA)]
    pub commit_sha: String,

    /// Git commit ref
    #[clap(long = "commit.ref", env = "DRONE_COMMIT_REF")]
    pub commit_ref: Option<String>,

    /// Squash the layers at build time
    #[clap(long, env = "PLUGIN_SQUASH", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub squash: bool,

    /// Docker username (falls back to DOCKER_USERNAME)
    #[clap(long = "docker.username", env = "PLUGIN_USERNAME")]
    pub username: Option<String>,

    /// Docker password (falls back to DOCKER_PASSWORD)
    #[clap(long = "docker.password", env = "PLUGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Remove the built image and prune the engine afterwards
    #[clap(
        long = "docker.purge",
        env = "PLUGIN_PURGE",
        action = ArgAction::Set,
        default_value_t = true,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub purge: bool,

    /// Edition passed to the build helper
    #[clap(long, env = "PLUGIN_EDITION", default_value = "oss")]
    pub edition: String,

    /// Also build the Ubuntu variant
    #[clap(long, env = "PLUGIN_UBUNTU", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub ubuntu: bool,

    /// Directory to run the build in
    #[clap(long, env = "PLUGIN_DIRECTORY", value_name = "DIR")]
    pub directory: Option<String>,

    /// Socket the Docker daemon binds to
    #[clap(long = "daemon.host", env = "PLUGIN_DAEMON_HOST", default_value = DEFAULT_DAEMON_HOST)]
    pub daemon_host: String,

    /// Start the daemon with experimental features (needed for manifests)
    #[clap(
        long = "daemon.experimental",
        env = "PLUGIN_DAEMON_EXPERIMENTAL",
        action = ArgAction::Set,
        default_value_t = true,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub daemon_experimental: bool,

    /// Times to probe the daemon before giving up
    #[clap(
        long = "daemon.attempts",
        env = "PLUGIN_DAEMON_ATTEMPTS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub daemon_attempts: u32,

    /// Seconds between two daemon probes
    #[clap(long = "daemon.interval", env = "PLUGIN_DAEMON_INTERVAL", default_value_t = 1)]
    pub daemon_interval: u64,

    /// Docker CLI executable
    #[clap(long, env = "PLUGIN_DOCKER_PATH", default_value = DEFAULT_DOCKER_PATH)]
    pub docker_path: PathBuf,

    /// Docker daemon executable
    #[clap(long, env = "PLUGIN_DOCKERD_PATH", default_value = DEFAULT_DOCKERD_PATH)]
    pub dockerd_path: PathBuf,

    /// Build helper executable
    #[clap(long, env = "PLUGIN_BUILDER_PATH", default_value = DEFAULT_BUILDER_PATH)]
    pub builder_path: PathBuf,
}

impl PluginArgs {
    /// Step settings, reading credential fallbacks from the process environment
    pub fn settings(&self) -> Settings {
        self.settings_with_env(|key| std::env::var(key).ok())
    }

    /// Step settings, reading credential fallbacks through `env`
    pub fn settings_with_env(&self, env: impl Fn(&str) -> Option<String>) -> Settings {
        let username = non_empty(self.username.clone())
            .or_else(|| non_empty(env("DOCKER_USERNAME")))
            .unwrap_or_default();
        let password = non_empty(self.password.clone())
            .or_else(|| non_empty(env("DOCKER_PASSWORD")))
            .unwrap_or_default();

        Settings {
            login: Login { username, password },
            build: Build {
                edition: self.edition.clone(),
                ubuntu: self.ubuntu,
                directory: non_empty(self.directory.clone()).map(PathBuf::from),
                remote: non_empty(self.remote_url.clone()),
                commit_ref: non_empty(self.commit_ref.clone()),
                name: non_empty(Some(self.commit_sha.clone()))
                    .unwrap_or_else(|| DEFAULT_COMMIT_SHA.to_string()),
                squash: self.squash,
            },
            daemon: Daemon {
                host: self.daemon_host.clone(),
                experimental: self.daemon_experimental,
            },
            dry_run: self.dry_run,
            cleanup: self.purge,
        }
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            docker: self.docker_path.clone(),
            dockerd: self.dockerd_path.clone(),
            builder: self.builder_path.clone(),
            poll: PollPolicy {
                max_attempts: self.daemon_attempts,
                interval: Duration::from_secs(self.daemon_interval),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Output format for `--plan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["docker-build-step"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flag_names() {
        let cli = parse(&[
            "--dry-run",
            "--commit.sha",
            "abc123",
            "--docker.username",
            "u",
            "--docker.password",
            "p",
            "--docker.purge",
            "false",
            "--squash",
            "--edition",
            "enterprise",
            "--ubuntu",
        ]);
        let settings = cli.args.settings_with_env(|_| None);

        assert!(settings.dry_run);
        assert!(!settings.cleanup);
        assert!(settings.build.squash);
        assert!(settings.build.ubuntu);
        assert_eq!(settings.build.name, "abc123");
        assert_eq!(settings.build.edition, "enterprise");
        assert_eq!(settings.login.username, "u");
        assert_eq!(settings.login.password, "p");
    }

    #[test]
    fn test_credential_fallback() {
        let cli = parse(&["--docker.username", "plugin-user"]);
        let settings = cli.args.settings_with_env(|key| match key {
            "DOCKER_USERNAME" => Some("docker-user".into()),
            "DOCKER_PASSWORD" => Some("docker-pass".into()),
            _ => None,
        });

        assert_eq!(settings.login.username, "plugin-user");
        assert_eq!(settings.login.password, "docker-pass");
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let cli = parse(&["--directory", "", "--commit.sha", ""]);
        let settings = cli.args.settings_with_env(|_| None);

        assert_eq!(settings.build.directory, None);
        assert_eq!(settings.build.name, "00000000");
    }

    #[test]
    fn test_toolchain_overrides() {
        let cli = parse(&[
            "--docker-path",
            "/opt/docker",
            "--daemon.attempts",
            "3",
            "--daemon.interval",
            "2",
        ]);
        let toolchain = cli.args.toolchain();

        assert_eq!(toolchain.docker, PathBuf::from("/opt/docker"));
        assert_eq!(toolchain.dockerd, PathBuf::from("/usr/local/bin/dockerd"));
        assert_eq!(toolchain.poll.max_attempts, 3);
        assert_eq!(toolchain.poll.interval, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Cli::try_parse_from(["docker-build-step", "--daemon.attempts", "0"]).is_err());
    }

    #[test]
    fn test_format_requires_plan() {
        assert!(Cli::try_parse_from(["docker-build-step", "--format", "json"]).is_err());
        let cli = parse(&["--plan", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
