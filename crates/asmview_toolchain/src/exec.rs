//! Process-backed `ToolRunner`.
//!
//! Execution contract:
//! - batch capture only: both streams are drained to completion, no
//!   streaming
//! - capture is capped per stream at `max_output_bytes`; overflow is
//!   drained and dropped and the result is flagged `truncated`
//! - an optional wall-clock bound kills the child on expiry and fails
//!   the run with `CompileError::Timeout`
//! - termination by signal surfaces as exit code -1

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use asmview_core::{CompileError, ExecOptions, ExecOutput, ToolInvocation, ToolKind, ToolRunner};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs tool invocations as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(
        &self,
        invocation: &ToolInvocation,
        options: &ExecOptions,
    ) -> Result<ExecOutput, CompileError> {
        let mut cmd = Command::new(&invocation.bin);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(|err| CompileError::Spawn {
            tool: invocation.tool,
            message: format!("{}: {}", invocation.bin, err),
        })?;

        let stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| CompileError::Io("child stdout pipe missing".to_string()))?;
        let stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| CompileError::Io("child stderr pipe missing".to_string()))?;
        let cap = options.max_output_bytes;
        let stdout_reader = thread::spawn(move || read_capped(stdout_pipe, cap));
        let stderr_reader = thread::spawn(move || read_capped(stderr_pipe, cap));

        // Join the readers before surfacing a timeout so the capture
        // threads never outlive the call.
        let waited = wait_bounded(&mut child, invocation.tool, options.timeout_ms);
        let (stdout, stdout_truncated) = join_reader(stdout_reader)?;
        let (stderr, stderr_truncated) = join_reader(stderr_reader)?;
        let status = waited?;

        Ok(ExecOutput {
            exit_code: exit_code_of(status),
            stdout,
            stderr,
            truncated: stdout_truncated || stderr_truncated,
        })
    }
}

/// Probe whether `bin` exists and answers `--version` with exit 0.
pub fn tool_available(bin: &str) -> bool {
    Command::new(bin)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

fn wait_bounded(
    child: &mut Child,
    tool: ToolKind,
    timeout_ms: Option<u64>,
) -> Result<ExitStatus, CompileError> {
    let timeout_ms = match timeout_ms {
        Some(ms) => ms,
        None => return child.wait().map_err(|err| CompileError::Io(err.to_string())),
    };
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CompileError::Timeout { tool, timeout_ms });
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(err) => return Err(CompileError::Io(err.to_string())),
        }
    }
}

fn read_capped(mut pipe: impl Read, cap: usize) -> std::io::Result<(String, bool)> {
    let mut captured = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    // Keep draining past the cap so the child never blocks on a full
    // pipe.
    loop {
        let n = pipe.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(captured.len());
        if n > room {
            truncated = true;
        }
        captured.extend_from_slice(&chunk[..n.min(room)]);
    }
    Ok((String::from_utf8_lossy(&captured).into_owned(), truncated))
}

fn join_reader(
    handle: thread::JoinHandle<std::io::Result<(String, bool)>>,
) -> Result<(String, bool), CompileError> {
    handle
        .join()
        .map_err(|_| CompileError::Io("output capture thread panicked".to_string()))?
        .map_err(|err| CompileError::Io(err.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn sh_available() -> bool {
        Command::new("sh")
            .args(["-c", "exit 0"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn sh_invocation(script: &str) -> ToolInvocation {
        ToolInvocation {
            tool: ToolKind::Assembler,
            bin: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[test]
    fn captures_streams_and_exit_code() {
        if !sh_available() {
            return;
        }
        let output = ProcessRunner
            .run(
                &sh_invocation("echo out; echo err >&2; exit 3"),
                &ExecOptions::default(),
            )
            .expect("run sh");
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.truncated);
    }

    #[test]
    fn zero_exit_reports_zero() {
        if !sh_available() {
            return;
        }
        let output = ProcessRunner
            .run(&sh_invocation("true"), &ExecOptions::default())
            .expect("run sh");
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn output_beyond_the_cap_is_dropped_and_flagged() {
        if !sh_available() {
            return;
        }
        let options = ExecOptions::default().with_max_output_bytes(4);
        let output = ProcessRunner
            .run(&sh_invocation("printf aaaaaaaa"), &options)
            .expect("run sh");
        assert_eq!(output.stdout, "aaaa");
        assert!(output.truncated);
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let err = ProcessRunner
            .run(
                &ToolInvocation {
                    tool: ToolKind::Disassembler,
                    bin: "asmview-no-such-tool".to_string(),
                    args: vec![],
                },
                &ExecOptions::default(),
            )
            .expect_err("spawn must fail");
        match err {
            CompileError::Spawn { tool, .. } => assert_eq!(tool, ToolKind::Disassembler),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn deadline_kills_the_child() {
        if !sh_available() {
            return;
        }
        let options = ExecOptions::default().with_timeout_ms(50);
        let err = ProcessRunner
            .run(&sh_invocation("sleep 5"), &options)
            .expect_err("timeout expected");
        match err {
            CompileError::Timeout { timeout_ms, .. } => assert_eq!(timeout_ms, 50),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn cwd_is_honored() {
        if !sh_available() {
            return;
        }
        let dir = tempfile::tempdir().expect("tempdir");
        let options = ExecOptions::default().with_cwd(dir.path());
        let output = ProcessRunner
            .run(&sh_invocation("pwd"), &options)
            .expect("run sh");
        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().expect("canonicalize pwd"),
            dir.path().canonicalize().expect("canonicalize tempdir")
        );
    }

    #[test]
    fn env_overrides_reach_the_child() {
        if !sh_available() {
            return;
        }
        let options = ExecOptions::default().with_env("ASMVIEW_PROBE", "42");
        let output = ProcessRunner
            .run(&sh_invocation("printf %s \"$ASMVIEW_PROBE\""), &options)
            .expect("run sh");
        assert_eq!(output.stdout, "42");
    }

    #[test]
    fn probe_rejects_a_missing_tool() {
        assert!(!tool_available("asmview-no-such-tool"));
    }
}
