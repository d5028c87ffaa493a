// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Command descriptors
//!
//! A [`CommandSpec`] describes one external program invocation. It is built
//! by the pipeline assembly code, handed to a
//! [`CommandRunner`](crate::runner::CommandRunner) once, and dropped.

mod docker;

pub use docker::{
    build_image, daemon, docker_info, docker_login, docker_prune, docker_rmi, docker_version,
    readiness_probe,
};

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::REDACTED;

/// What a command is for
///
/// Failure handling is decided on the kind, never by re-reading arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// The Docker daemon itself
    Daemon,
    /// `docker info` used to poll for daemon readiness
    Probe,
    /// `docker login`
    Login,
    /// `docker version`
    Version,
    /// `docker info`
    Info,
    /// The build helper invocation
    Build,
    /// `docker rmi <tag>`
    RemoveImage,
    /// `docker system prune -f`
    Prune,
}

impl CommandKind {
    /// Whether a failure of this command may be ignored
    pub fn is_best_effort(self) -> bool {
        matches!(self, Self::RemoveImage | Self::Prune)
    }

    /// Short human readable name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daemon => "daemon",
            Self::Probe => "probe",
            Self::Login => "login",
            Self::Version => "version",
            Self::Info => "info",
            Self::Build => "build",
            Self::RemoveImage => "remove-image",
            Self::Prune => "prune",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external program invocation
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    kind: CommandKind,
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    /// Indices into `args` whose values must never be logged
    sensitive: Vec<usize>,
    /// Forward output to the step log while it runs
    stream_output: bool,
    /// Keep only this many trailing lines of captured output
    output_limit: Option<usize>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments
    pub fn new(kind: CommandKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            sensitive: Vec::new(),
            stream_output: false,
            output_limit: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append an argument that is masked in logs and plans
    pub fn sensitive_arg(mut self, arg: impl Into<String>) -> Self {
        self.sensitive.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Run the command in `dir`
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Stream output to the step log as it is produced
    pub fn streaming(mut self) -> Self {
        self.stream_output = true;
        self
    }

    /// Capture at most the last `lines` lines of output
    pub fn keep_last_lines(mut self, lines: usize) -> Self {
        self.output_limit = Some(lines);
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Raw arguments, secrets included
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    pub fn streams_output(&self) -> bool {
        self.stream_output
    }

    pub fn output_limit(&self) -> Option<usize> {
        self.output_limit
    }

    /// Arguments with sensitive values replaced
    pub fn display_args(&self) -> Vec<Cow<'_, str>> {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if self.sensitive.contains(&i) {
                    Cow::Borrowed(REDACTED)
                } else {
                    Cow::Borrowed(arg.as_str())
                }
            })
            .collect()
    }

    /// Serializable, redacted view of this command
    pub fn planned(&self) -> PlannedCommand {
        PlannedCommand {
            kind: self.kind,
            program: self.program.clone(),
            args: self.display_args().into_iter().map(Cow::into_owned).collect(),
            current_dir: self.current_dir.clone(),
            best_effort: self.kind.is_best_effort(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.display_args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

// Debug goes through the redacted rendering as well.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("kind", &self.kind)
            .field("command", &self.to_string())
            .field("current_dir", &self.current_dir)
            .field("stream_output", &self.stream_output)
            .field("output_limit", &self.output_limit)
            .finish()
    }
}

/// A command as shown by `--plan`
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCommand {
    pub kind: CommandKind,
    pub program: PathBuf,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dir: Option<PathBuf>,
    pub best_effort: bool,
}
