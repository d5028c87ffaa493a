// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Recording runner for tests
//!
//! Never spawns anything. Records every command it is handed and answers
//! according to a small script.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use super::{CommandOutput, CommandRunner};
use crate::command::{CommandKind, CommandSpec};
use crate::errors::StepError;

#[derive(Default)]
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    /// Probe attempt (1-based) from which the daemon answers; `None` = never
    ready_on: Mutex<Option<usize>>,
    failing: Mutex<HashSet<CommandKind>>,
    unspawnable: Mutex<HashSet<CommandKind>>,
}

impl RecordingRunner {
    /// Daemon answers on the first probe, every command succeeds
    pub(crate) fn new() -> Self {
        let runner = Self::default();
        *runner.ready_on.lock().unwrap() = Some(1);
        runner
    }

    pub(crate) fn ready_on(self, attempt: Option<usize>) -> Self {
        *self.ready_on.lock().unwrap() = attempt;
        self
    }

    /// Commands of `kind` exit with status 1
    pub(crate) fn failing(self, kind: CommandKind) -> Self {
        self.failing.lock().unwrap().insert(kind);
        self
    }

    /// Commands of `kind` cannot be spawned
    pub(crate) fn unspawnable(self, kind: CommandKind) -> Self {
        self.unspawnable.lock().unwrap().insert(kind);
        self
    }

    /// Every recorded command
    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded kinds, excluding the background daemon
    pub(crate) fn kinds(&self) -> Vec<CommandKind> {
        self.calls()
            .iter()
            .map(CommandSpec::kind)
            .filter(|kind| *kind != CommandKind::Daemon)
            .collect()
    }

    pub(crate) fn count(&self, kind: CommandKind) -> usize {
        self.calls().iter().filter(|c| c.kind() == kind).count()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StepError> {
        let kind = command.kind();
        self.calls.lock().unwrap().push(command.clone());

        if self.unspawnable.lock().unwrap().contains(&kind) {
            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
            return Err(StepError::spawn(command.program(), &io));
        }

        let ok = if kind == CommandKind::Probe {
            let attempt = self.count(CommandKind::Probe);
            matches!(*self.ready_on.lock().unwrap(), Some(ready) if attempt >= ready)
        } else {
            !self.failing.lock().unwrap().contains(&kind)
        };

        if ok {
            Ok(CommandOutput::success(format!("{} ok\n", kind), Duration::ZERO))
        } else {
            Ok(CommandOutput::failure(
                format!("{} failed\n", kind),
                1,
                Duration::ZERO,
            ))
        }
    }
}
