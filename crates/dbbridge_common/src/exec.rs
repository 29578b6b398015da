//! Shell execution layer.
//!
//! Runs recipe commands through `sh -c`, captures real exit code, stdout,
//! stderr and duration, and returns structured results without
//! reinterpreting errors. Install commands can hang on package-manager
//! prompts, so every run is bounded by a timeout and known-interactive
//! commands are rewritten up front.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Maximum output length to capture (prevent memory issues)
const MAX_OUTPUT_BYTES: usize = 64 * 1024; // 64KB

/// Default timeout for install commands
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Result of a command execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Full command that was executed
    pub command: String,
    /// Exit code (0 = success, -1 when the process never ran)
    pub exit_code: i32,
    /// Stdout (truncated if too long)
    pub stdout: String,
    /// Whether stdout was truncated
    pub stdout_truncated: bool,
    /// Stderr (truncated if too long)
    pub stderr: String,
    /// Whether stderr was truncated
    pub stderr_truncated: bool,
    /// Execution duration
    pub duration_ms: u64,
    /// Execution status
    pub status: ExecStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status == ExecStatus::Success
    }
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecStatus {
    /// Command ran successfully (exit code 0)
    Success,
    /// Command ran but returned non-zero exit code
    NonZeroExit,
    /// Command not found on system
    CommandNotFound,
    /// Permission denied
    PermissionDenied,
    /// Command timed out
    Timeout,
    /// Other OS error
    OsError,
}

impl ExecStatus {
    /// Human-readable description
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NonZeroExit => "non-zero exit",
            Self::CommandNotFound => "command not found",
            Self::PermissionDenied => "permission denied",
            Self::Timeout => "timeout",
            Self::OsError => "OS error",
        }
    }
}

/// Shell runner with a per-command timeout
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Execute a shell command string via `sh -c`.
    ///
    /// The command is first rewritten to a non-interactive form where a
    /// known-interactive tool is involved.
    pub async fn run(&self, command: &str) -> CommandResult {
        let command = make_noninteractive(command).into_owned();
        let start = Instant::now();

        tracing::debug!(command = %command, "executing shell command");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new("sh")
                .arg("-c")
                .arg(&command)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match output {
            Err(_elapsed) => CommandResult {
                command: command.clone(),
                exit_code: -1,
                stdout: String::new(),
                stdout_truncated: false,
                stderr: format!("timed out after {}s", self.timeout.as_secs()),
                stderr_truncated: false,
                duration_ms,
                status: ExecStatus::Timeout,
            },
            Ok(Ok(output)) => {
                let (stdout, stdout_truncated) = truncate_output(&output.stdout);
                let (stderr, stderr_truncated) = truncate_output(&output.stderr);
                let exit_code = output.status.code().unwrap_or(-1);

                let status = if output.status.success() {
                    ExecStatus::Success
                } else if stderr.contains("command not found")
                    || stderr.contains("not found") && exit_code == 127
                {
                    ExecStatus::CommandNotFound
                } else if stderr.contains("Permission denied") {
                    ExecStatus::PermissionDenied
                } else {
                    ExecStatus::NonZeroExit
                };

                CommandResult {
                    command: command.clone(),
                    exit_code,
                    stdout,
                    stdout_truncated,
                    stderr,
                    stderr_truncated,
                    duration_ms,
                    status,
                }
            }
            Ok(Err(e)) => {
                let status = if e.kind() == std::io::ErrorKind::NotFound {
                    ExecStatus::CommandNotFound
                } else if e.kind() == std::io::ErrorKind::PermissionDenied {
                    ExecStatus::PermissionDenied
                } else {
                    ExecStatus::OsError
                };

                CommandResult {
                    command: command.clone(),
                    exit_code: -1,
                    stdout: String::new(),
                    stdout_truncated: false,
                    stderr: format!("OS error: {}", e),
                    stderr_truncated: false,
                    duration_ms,
                    status,
                }
            }
        }
    }
}

/// Whether the current process runs with effective UID 0.
///
/// Package-manager and pecl commands mutate system state and are refused
/// without root rather than left to fail halfway through.
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Rewrite a command to a non-interactive form where needed.
///
/// `unzip` gains `-o` so existing files are overwritten without prompting,
/// and `pecl install` gets a newline piped in to accept its default answer
/// (the Oracle home directory prompt).
pub fn make_noninteractive(command: &str) -> std::borrow::Cow<'_, str> {
    if command.contains("unzip") && !command.contains("-o") {
        return command.replacen("unzip", "unzip -o", 1).into();
    }

    if command.contains("pecl install") {
        return format!("echo '\\n' | {}", command).into();
    }

    command.into()
}

/// Whether a failed command should abort the remaining sequence.
pub fn is_critical(command: &str) -> bool {
    const CRITICAL_PATTERNS: &[&str] = &[
        "apt-get install",
        "yum install",
        "pecl install",
        "mkdir -p /opt/oracle",
        "ldconfig",
    ];

    CRITICAL_PATTERNS.iter().any(|p| command.contains(p))
}

/// Truncate output to max bytes, converting to string
fn truncate_output(bytes: &[u8]) -> (String, bool) {
    let truncated = bytes.len() > MAX_OUTPUT_BYTES;
    let slice = if truncated {
        &bytes[..MAX_OUTPUT_BYTES]
    } else {
        bytes
    };

    let output = String::from_utf8_lossy(slice).to_string();
    (output, truncated)
}
