//! Bounded execution of external commands.
//!
//! Everything the agent runs comes through here so every subprocess gets the
//! same treatment: piped output, a wall-clock timeout, and an output cap.

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o failure while reading {program} output: {source}")]
    Read {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} produced more than {limit_bytes} bytes of output")]
    OutputCap { program: String, limit_bytes: usize },
    #[error("{program} timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program` to completion within `limits`. Returns both streams decoded
/// lossily; a non-zero exit becomes an error carrying a stderr snippet.
/// The child is killed if it overruns either limit.
pub async fn run_with_limits(
    program: &str,
    args: &[&str],
    limits: &Limits,
) -> Result<CommandOutput, ExecError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let cap = limits.max_output_bytes;
    let pipes = child.stdout.take().zip(child.stderr.take());

    let work = async {
        let mut out = Vec::new();
        let mut err = Vec::new();
        if let Some((stdout, stderr)) = pipes {
            // Read one byte past the cap so an exactly-at-cap stream passes.
            // Both streams drain concurrently or a chatty child could stall
            // on a full pipe.
            let mut stdout = stdout.take(cap as u64 + 1);
            let mut stderr = stderr.take(cap as u64 + 1);
            tokio::try_join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err))
                .map_err(|source| ExecError::Read {
                    program: program.to_string(),
                    source,
                })?;
        }
        if out.len() > cap || err.len() > cap {
            let _ = child.kill().await;
            return Err(ExecError::OutputCap {
                program: program.to_string(),
                limit_bytes: cap,
            });
        }
        let status = child.wait().await.map_err(|source| ExecError::Read {
            program: program.to_string(),
            source,
        })?;
        if !status.success() {
            return Err(ExecError::Failed {
                program: program.to_string(),
                status: status.to_string(),
                stderr: snippet(&String::from_utf8_lossy(&err)),
            });
        }
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        })
    };

    // On timeout the in-flight future is dropped and `child` goes out of
    // scope on return; kill_on_drop reaps the process.
    match timeout(limits.timeout, work).await {
        Ok(done) => done,
        Err(_) => Err(ExecError::Timeout {
            program: program.to_string(),
            timeout_ms: limits.timeout.as_millis() as u64,
        }),
    }
}

/// First 200 chars of trimmed stderr, enough for an error message.
fn snippet(text: &str) -> String {
    text.trim().chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_limits() -> Limits {
        Limits {
            timeout: Duration::from_secs(5),
            max_output_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn captures_stdout_of_a_simple_command() {
        let out = run_with_limits("echo", &["hello"], &wide_limits())
            .await
            .expect("echo should run");
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn nonzero_exit_reports_failure() {
        match run_with_limits("false", &[], &wide_limits()).await {
            Err(ExecError::Failed { program, .. }) => assert_eq!(program, "false"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_reports_spawn_error() {
        match run_with_limits("/nonexistent/binary/xyz", &[], &wide_limits()).await {
            Err(ExecError::Spawn { .. }) => {}
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stderr_text_survives_into_the_error() {
        match run_with_limits("sh", &["-c", "echo boom >&2; exit 3"], &wide_limits()).await {
            Err(ExecError::Failed { status, stderr, .. }) => {
                assert!(status.contains('3'), "status was {status}");
                assert!(stderr.contains("boom"), "stderr was {stderr}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let limits = Limits {
            timeout: Duration::from_millis(100),
            max_output_bytes: 1024,
        };
        match run_with_limits("sh", &["-c", "sleep 5"], &limits).await {
            Err(ExecError::Timeout { timeout_ms, .. }) => assert_eq!(timeout_ms, 100),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn oversized_output_is_cut_off() {
        let limits = Limits {
            timeout: Duration::from_secs(5),
            max_output_bytes: 1024,
        };
        match run_with_limits("sh", &["-c", "head -c 8192 /dev/zero"], &limits).await {
            Err(ExecError::OutputCap { limit_bytes, .. }) => assert_eq!(limit_bytes, 1024),
            other => panic!("expected OutputCap, got {other:?}"),
        }
    }
}
