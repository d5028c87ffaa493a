// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Command pipeline
//!
//! The ordered list of commands the step runs once the daemon is up and the
//! registry login is done. Insertion order is execution order.

mod executor;

pub use executor::{PipelineExecutor, PipelineReport, StepOutcome, StepRecord};

use tracing::debug;

use crate::command::{self, CommandKind, CommandSpec, PlannedCommand};
use crate::config::{Settings, Toolchain};

/// Ordered sequence of commands
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    commands: Vec<CommandSpec>,
}

impl Pipeline {
    /// Assemble the pipeline for `settings`
    ///
    /// Always `version`, `info`, build; then `rmi` and `prune` when cleanup
    /// is enabled. A configured build directory applies to every command.
    pub fn assemble(settings: &Settings, toolchain: &Toolchain) -> Self {
        let mut pipeline = Self::default();

        pipeline.push(command::docker_version(toolchain));
        pipeline.push(command::docker_info(toolchain));
        pipeline.push(command::build_image(toolchain, &settings.build));

        if settings.cleanup {
            pipeline.push(command::docker_rmi(toolchain, &settings.build.name));
            pipeline.push(command::docker_prune(toolchain));
        }

        if let Some(dir) = &settings.build.directory {
            debug!(directory = %dir.display(), "Building in directory");
            pipeline.commands = pipeline
                .commands
                .into_iter()
                .map(|cmd| cmd.current_dir(dir))
                .collect();
        }

        pipeline
    }

    /// Append a command; its output is streamed to the step log
    pub fn push(&mut self, command: CommandSpec) {
        self.commands.push(command.streaming());
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn kinds(&self) -> Vec<CommandKind> {
        self.commands.iter().map(CommandSpec::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Redacted view for `--plan`
    pub fn planned(&self) -> Vec<PlannedCommand> {
        self.commands.iter().map(CommandSpec::planned).collect()
    }
}

impl IntoIterator for Pipeline {
    type Item = CommandSpec;
    type IntoIter = std::vec::IntoIter<CommandSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}
