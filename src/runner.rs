//! Command Runner
//!
//! Runs the wrapped build command with stdin and stdout inherited. Stderr is
//! piped, forwarded to the terminal chunk by chunk, and captured for the
//! explanation step.

use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::types::{ExplainError, Result};

/// Exit code used when the command cannot be launched or is killed by a signal
pub const FAILURE_EXIT_CODE: i32 = 1;

const CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of running the wrapped command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Everything the command wrote to stderr, lossily decoded
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `argv` to completion
///
/// A command that cannot be started is reported as exit code 1 with the
/// launch error as its stderr, so it goes through the explanation path like
/// any other failure.
pub async fn run(argv: &[String]) -> Result<CommandOutput> {
    let (program, args) = argv.split_first().ok_or(ExplainError::EmptyCommand)?;

    debug!(program = %program, args = args.len(), "Running command");

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!(program = %program, error = %e, "Failed to launch command");
            return Ok(CommandOutput {
                exit_code: FAILURE_EXIT_CODE,
                stderr: format!("Failed to execute '{}': {}", program, e),
            });
        }
    };

    let captured = match child.stderr.take() {
        Some(pipe) => capture_stderr(&mut child, pipe).await?,
        None => Vec::new(),
    };

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(FAILURE_EXIT_CODE);

    debug!(exit_code, captured_bytes = captured.len(), "Command finished");

    Ok(CommandOutput {
        exit_code,
        stderr: String::from_utf8_lossy(&captured).into_owned(),
    })
}

/// Tee the child's stderr; on a read error the child is killed and reaped
async fn capture_stderr<R>(child: &mut Child, pipe: R) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    match tee(pipe, tokio::io::stderr()).await {
        Ok(captured) => Ok(captured),
        Err(e) => {
            warn!(error = %e, "Lost stderr of running command, stopping it");
            if let Err(kill_err) = child.kill().await {
                warn!(error = %kill_err, "Failed to stop command");
            }
            Err(e)
        }
    }
}

/// Copy `reader` into `writer` until EOF and return everything read
async fn tee<R, W>(mut reader: R, mut writer: W) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&chunk[..n]);
        // Terminal write failures must not lose the capture
        if writer.write_all(&chunk[..n]).await.is_ok() {
            let _ = writer.flush().await;
        }
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stderr_and_exit_code() {
        let output = run(&sh("echo 'main.c:3:1: error: oops' >&2; exit 2"))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 2);
        assert!(!output.success());
        assert_eq!(output.stderr, "main.c:3:1: error: oops\n");
    }

    #[tokio::test]
    async fn test_stdout_not_captured() {
        let output = run(&sh("echo to-stdout; echo to-stderr >&2")).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stderr, "to-stderr\n");
    }

    #[tokio::test]
    async fn test_launch_failure_is_exit_one() {
        let argv = vec!["definitely-not-a-real-binary-4242".to_string()];
        let output = run(&argv).await.unwrap();

        assert_eq!(output.exit_code, FAILURE_EXIT_CODE);
        assert!(output.stderr.contains("definitely-not-a-real-binary-4242"));
    }

    #[tokio::test]
    async fn test_signal_is_exit_one() {
        let output = run(&sh("kill -9 $$")).await.unwrap();
        assert_eq!(output.exit_code, FAILURE_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_empty_argv() {
        assert!(matches!(run(&[]).await, Err(ExplainError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_tee_copies_and_captures() {
        let input: &[u8] = b"line one\nline \xff two\n";
        let mut sink = Vec::new();

        let captured = tee(input, &mut sink).await.unwrap();

        assert_eq!(captured, input);
        assert_eq!(sink, input);
    }

    struct BrokenPipe;

    impl AsyncRead for BrokenPipe {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::other("pipe gone")))
        }
    }

    #[tokio::test]
    async fn test_stderr_read_failure_reaps_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        let err = capture_stderr(&mut child, BrokenPipe).await.unwrap_err();

        assert_eq!(err.to_string(), "pipe gone");
        let status = child.try_wait().unwrap();
        assert!(status.is_some_and(|s| !s.success()));
    }
}
