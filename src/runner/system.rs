// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! System runner
//!
//! Spawns real processes with tokio.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Split};
use tokio::process::Command;

use super::{CommandOutput, CommandRunner};
use crate::command::CommandSpec;
use crate::errors::StepError;

/// Runner backed by `tokio::process`
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StepError> {
        let start = Instant::now();

        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments());
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| StepError::spawn(command.program(), &e))?;

        let stdout = child.stdout.take().map(|s| BufReader::new(s).split(b'\n'));
        let stderr = child.stderr.take().map(|s| BufReader::new(s).split(b'\n'));
        let mut buffer = OutputBuffer::new(command.output_limit());
        collect_output(stdout, stderr, command.streams_output(), &mut buffer).await?;
        let output = buffer.into_string();

        let status = child.wait().await?;
        let duration = start.elapsed();

        if status.success() {
            Ok(CommandOutput::success(output, duration))
        } else {
            Ok(CommandOutput::failure(
                output,
                status.code().unwrap_or(-1),
                duration,
            ))
        }
    }
}

/// Combined output lines, optionally capped to the most recent ones
struct OutputBuffer {
    lines: VecDeque<String>,
    limit: Option<usize>,
}

impl OutputBuffer {
    fn new(limit: Option<usize>) -> Self {
        Self {
            lines: VecDeque::new(),
            limit,
        }
    }

    fn push(&mut self, line: String) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while self.lines.len() >= limit {
                self.lines.pop_front();
            }
        }
        self.lines.push_back(line);
    }

    fn into_string(self) -> String {
        self.lines.into_iter().fold(String::new(), |mut out, line| {
            out.push_str(&line);
            out.push('\n');
            out
        })
    }
}

/// Drain both pipes into one buffer, optionally echoing each line
async fn collect_output<O, E>(
    mut stdout: Option<Split<O>>,
    mut stderr: Option<Split<E>>,
    echo: bool,
    combined: &mut OutputBuffer,
) -> std::io::Result<()>
where
    O: AsyncBufRead + Unpin,
    E: AsyncBufRead + Unpin,
{
    loop {
        tokio::select! {
            segment = next_segment(&mut stdout), if stdout.is_some() => match segment? {
                Some(bytes) => {
                    let line = String::from_utf8_lossy(&bytes);
                    if echo {
                        println!("{}", line);
                    }
                    combined.push(line.into_owned());
                }
                None => stdout = None,
            },
            segment = next_segment(&mut stderr), if stderr.is_some() => match segment? {
                Some(bytes) => {
                    let line = String::from_utf8_lossy(&bytes);
                    if echo {
                        eprintln!("{}", line);
                    }
                    combined.push(line.into_owned());
                }
                None => stderr = None,
            },
            else => break,
        }
    }

    Ok(())
}

async fn next_segment<R: AsyncBufRead + Unpin>(
    split: &mut Option<Split<R>>,
) -> std::io::Result<Option<Vec<u8>>> {
    match split {
        Some(split) => split.next_segment().await,
        None => Ok(None),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::command::CommandKind;

    #[tokio::test]
    async fn test_captures_both_streams() {
        let cmd = CommandSpec::new(CommandKind::Info, "sh")
            .arg("-c")
            .arg("echo out; echo err 1>&2");

        let result = SystemRunner::new().run(&cmd).await.unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("out\n"));
        assert!(result.output.contains("err\n"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let cmd = CommandSpec::new(CommandKind::Build, "sh")
            .arg("-c")
            .arg("echo boom; exit 3");

        let result = SystemRunner::new().run(&cmd).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output, "boom\n");
    }

    #[tokio::test]
    async fn test_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = CommandSpec::new(CommandKind::Version, "sh")
            .args(["-c", "pwd"])
            .current_dir(dir.path());

        let result = SystemRunner::new().run(&cmd).await.unwrap();
        let reported = std::path::PathBuf::from(result.output.trim());

        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_output_limit_keeps_last_lines() {
        let cmd = CommandSpec::new(CommandKind::Daemon, "sh")
            .args(["-c", "for i in 1 2 3 4 5; do echo line$i; done; exit 1"])
            .keep_last_lines(2);

        let result = SystemRunner::new().run(&cmd).await.unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(result.output, "line4\nline5\n");
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut buffer = OutputBuffer::new(Some(0));
        buffer.push("noise".into());
        assert_eq!(buffer.into_string(), "");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let cmd = CommandSpec::new(CommandKind::Version, "/nonexistent/docker").arg("version");

        let err = SystemRunner::new().run(&cmd).await.unwrap_err();
        assert!(matches!(err, StepError::Spawn { .. }));
    }
}
