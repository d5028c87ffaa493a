// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! # docker-build-step - Docker image build step for CI pipelines
//!
//! `docker-build-step` runs as one step of a Drone-style pipeline. It
//! starts a Docker daemon inside the step container, waits for it to
//! answer, logs into the registry and hands the actual image build to an
//! external build helper.
//!
//! ## Flow
//!
//! - **Launch** - `dockerd` starts on a detached task
//! - **Poll** - `docker info` until the daemon answers (15 attempts, 1s apart)
//! - **Login** - `docker login` unless running in dry-run mode
//! - **Pipeline** - `docker version`, `docker info`, the build helper, then
//!   `docker rmi` and `docker system prune -f` when cleanup is enabled
//!
//! Image removal and pruning are best effort; every other failure ends the
//! step with a non-zero exit code.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show what would run
//! docker-build-step --plan
//!
//! # Run with settings from the environment
//! PLUGIN_USERNAME=bot PLUGIN_PASSWORD=secret docker-build-step
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod daemon;
pub mod errors;
pub mod pipeline;
pub mod plugin;
pub mod runner;

// Re-export commonly used types
pub use config::{Settings, Toolchain};
pub use errors::{StepError, StepResult};
pub use pipeline::{Pipeline, PipelineReport};
pub use plugin::Plugin;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
