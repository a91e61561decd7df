/* Copyright (C) 2025 Pedro Henrique / phkaiser13
 * File: src/clients/command.rs
 * Shared helper for running the external tools. Output is captured rather
 * than streamed so a failing tool's stderr can be carried in the error that
 * ends the run.
 * SPDX-License-Identifier: Apache-2.0 */

use crate::error::CommandError;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

/// Runs `program args...` to completion and returns its stdout.
///
/// When `stdin` is given it is written to the child before waiting. A non-zero
/// exit becomes `CommandError::Failed` with the trimmed stderr attached.
pub async fn execute_command(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
) -> Result<String, CommandError> {
    debug!(program, args = ?args, "running command");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| CommandError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input.as_bytes())
            .await
            .map_err(|source| CommandError::Io {
                program: program.to_string(),
                source,
            })?;
        // Dropping the handle closes the pipe so the child sees EOF.
        drop(pipe);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|source| CommandError::Io {
            program: program.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    trace!(program, %stdout, "command output");

    if output.status.success() {
        Ok(stdout)
    } else {
        Err(CommandError::Failed {
            program: program.to_string(),
            args: args.to_vec(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let out = execute_command("sh", &args(&["-c", "echo ready"]), None)
            .await
            .unwrap();
        assert_eq!(out.trim(), "ready");
    }

    #[tokio::test]
    async fn test_feeds_stdin() {
        let out = execute_command("cat", &[], Some("kind: Namespace\n"))
            .await
            .unwrap();
        assert_eq!(out, "kind: Namespace\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let err = execute_command("sh", &args(&["-c", "echo boom >&2; exit 3"]), None)
            .await
            .unwrap_err();
        match err {
            CommandError::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = execute_command("definitely-not-a-real-binary-4711", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
