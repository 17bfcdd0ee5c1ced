//! Bounded execution of external programs.

use std::process::Stdio;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error_handling::ProbeError;

/// Reads a child pipe to the end.
///
/// A missing pipe or a read error yields whatever was read so far; output is
/// diagnostic text and a partial capture is still worth returning.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf).await {
            debug!("Stopped reading child output early: {e}");
        }
    }
    buf
}

/// Picks the text to report: stdout, else stderr, else empty.
fn select_output(stdout: &[u8], stderr: &[u8]) -> String {
    if !stdout.is_empty() {
        String::from_utf8_lossy(stdout).into_owned()
    } else {
        String::from_utf8_lossy(stderr).into_owned()
    }
}

/// Runs `argv[0]` with the remaining elements as literal arguments.
///
/// No shell is involved, so arguments are passed through byte for byte.
/// Standard output and standard error are captured separately; the returned
/// string is stdout when non-empty, otherwise stderr, otherwise `""`.
///
/// A non-zero exit status is not an error: tools like `ping` report an
/// unreachable host through their exit code, and that report is the result.
///
/// # Errors
///
/// - [`ProbeError::Execution`] if `argv` is empty or the program cannot be
///   spawned or awaited
/// - [`ProbeError::Timeout`] if the program is still running after `timeout`;
///   the child has been killed and reaped by the time this is returned
pub async fn run(argv: &[String], timeout: Duration) -> Result<String, ProbeError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ProbeError::Execution("empty command".to_string()))?;

    let start = Instant::now();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProbeError::Execution(format!("failed to spawn {program}: {e}")))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let outcome = tokio::time::timeout(timeout, async {
        let (out, err, status) = tokio::join!(drain(stdout), drain(stderr), child.wait());
        status.map(|status| (out, err, status))
    })
    .await;

    match outcome {
        Ok(Ok((out, err, status))) => {
            debug!(
                "{program} exited with {status} after {:.2}s ({} bytes stdout, {} bytes stderr)",
                start.elapsed().as_secs_f64(),
                out.len(),
                err.len()
            );
            Ok(select_output(&out, &err))
        }
        Ok(Err(e)) => Err(ProbeError::Execution(format!(
            "failed to wait for {program}: {e}"
        ))),
        Err(_) => {
            warn!("{program} exceeded {}s, killing it", timeout.as_secs());
            // kill() also reaps the child, so no zombie is left behind
            if let Err(e) = child.kill().await {
                warn!("Failed to kill {program}: {e}");
            }
            Err(ProbeError::Timeout {
                program: program.clone(),
                seconds: timeout.as_secs(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_output_prefers_stdout() {
        assert_eq!(select_output(b"out", b"err"), "out");
        assert_eq!(select_output(b"", b"err"), "err");
        assert_eq!(select_output(b"", b""), "");
    }

    #[test]
    fn test_select_output_is_lossy() {
        assert_eq!(select_output(&[0x66, 0xff, 0x6f], b""), "f\u{fffd}o");
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = run(&argv(&["echo", "hello world"]), Duration::from_secs(5))
            .await
            .expect("echo should run");
        assert_eq!(output, "hello world\n");
    }

    #[tokio::test]
    async fn test_run_arguments_are_not_shell_interpreted() {
        let output = run(&argv(&["echo", "a; echo injected"]), Duration::from_secs(5))
            .await
            .expect("echo should run");
        assert_eq!(output, "a; echo injected\n");
    }

    #[tokio::test]
    async fn test_run_falls_back_to_stderr() {
        let output = run(
            &argv(&["sh", "-c", "echo oops >&2; exit 3"]),
            Duration::from_secs(5),
        )
        .await
        .expect("non-zero exit is not an error");
        assert_eq!(output, "oops\n");
    }

    #[tokio::test]
    async fn test_run_empty_output_is_empty_string() {
        let output = run(&argv(&["true"]), Duration::from_secs(5))
            .await
            .expect("true should run");
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_run_nonzero_exit_is_success() {
        let output = run(&argv(&["sh", "-c", "echo down; exit 1"]), Duration::from_secs(5))
            .await
            .expect("exit status is not an error");
        assert_eq!(output, "down\n");
    }

    #[tokio::test]
    async fn test_run_empty_argv_is_execution_error() {
        let result = run(&[], Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ProbeError::Execution(_))));
    }

    #[tokio::test]
    async fn test_run_missing_program_is_execution_error() {
        let result = run(
            &argv(&["definitely-not-a-real-binary-netdiag"]),
            Duration::from_secs(5),
        )
        .await;
        match result {
            Err(ProbeError::Execution(msg)) => {
                assert!(msg.contains("definitely-not-a-real-binary-netdiag"))
            }
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_timeout_returns_promptly() {
        let start = Instant::now();
        let result = run(&argv(&["sleep", "30"]), Duration::from_millis(300)).await;
        assert!(matches!(
            result,
            Err(ProbeError::Timeout { ref program, .. }) if program == "sleep"
        ));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_run_timeout_kills_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let result = run(&argv(&["sh", "-c", &script]), Duration::from_millis(500)).await;
        assert!(matches!(result, Err(ProbeError::Timeout { .. })));

        let pid = std::fs::read_to_string(&pid_file)
            .expect("child wrote its pid")
            .trim()
            .to_string();
        assert!(
            !std::path::Path::new(&format!("/proc/{pid}")).exists(),
            "child {pid} should have been killed and reaped"
        );
    }

    #[tokio::test]
    #[ignore = "requires the ping binary and permission to send ICMP"]
    async fn test_ping_loopback_returns_output() {
        let output = run(
            &argv(&["ping", "-q", "-c", "4", "127.0.0.1"]),
            Duration::from_secs(10),
        )
        .await
        .expect("ping should run");
        assert!(!output.is_empty());
    }
}
