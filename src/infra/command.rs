//! # Shell Execution Module / Shell 执行模块
//!
//! Runs an assembled command line as one shell invocation and captures its
//! combined stdout and stderr. Backslashes are turned into forward slashes
//! before dispatch. The host OS only picks the wrapper: a POSIX shell script
//! or a batch file.
//!
//! 将组装好的命令行作为一次 shell 调用运行，并捕获合并的 stdout 和 stderr。
//! 派发前将反斜杠转换为正斜杠。宿主操作系统只决定包装方式：POSIX shell 脚本或批处理文件。

use std::future::Future;
use std::io::Write;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;

use crate::core::command::CommandLine;
use crate::core::error::ExecutionError;
use crate::core::models::{HostOs, RunContext};

/// How long output is still collected after an interrupted command was killed.
const INTERRUPT_GRACE: Duration = Duration::from_millis(500);

/// What a finished (or interrupted) command left behind.
///
/// 已完成（或被中断）的命令留下的结果。
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    /// Combined stdout and stderr, one `\n` per line.
    pub text: String,
    /// Exit code of the shell, if it exited normally.
    pub exit_code: Option<i32>,
    /// The host stopped the command before it finished.
    pub interrupted: bool,
}

/// Runs a command line against a run context and returns the captured output.
///
/// 针对运行上下文执行命令行并返回捕获的输出。
pub trait CommandRunner {
    fn run(
        &self,
        command: &CommandLine,
        ctx: &RunContext,
    ) -> impl Future<Output = Result<CapturedOutput, ExecutionError>> + Send;
}

/// Uniform path separators for the shell: every `\` becomes `/`.
pub fn normalize_separators(command: &str) -> String {
    command.replace('\\', "/")
}

/// Runs commands through `sh -e <script>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixShell;

/// Runs commands through `cmd /c call <script>.bat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchFile;

/// Picks [`PosixShell`] or [`BatchFile`] from the run context's host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl PosixShell {
    fn script(command: &str) -> String {
        format!("{}\n", command)
    }

    async fn run_script(&self, script: &str, ctx: &RunContext) -> Result<CapturedOutput, ExecutionError> {
        let path = write_script(&Self::script(script), ".sh")?;
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-e").arg(&*path);
        run_shell(cmd, "sh", ctx).await
    }
}

impl BatchFile {
    fn script(command: &str) -> String {
        format!("@echo off\r\n{}\r\nexit /b %ERRORLEVEL%\r\n", command)
    }

    async fn run_script(&self, script: &str, ctx: &RunContext) -> Result<CapturedOutput, ExecutionError> {
        let path = write_script(&Self::script(script), ".bat")?;
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.arg("/c").arg("call").arg(&*path);
        run_shell(cmd, "cmd", ctx).await
    }
}

impl CommandRunner for PosixShell {
    async fn run(&self, command: &CommandLine, ctx: &RunContext) -> Result<CapturedOutput, ExecutionError> {
        self.run_script(&normalize_separators(&command.render()), ctx).await
    }
}

impl CommandRunner for BatchFile {
    async fn run(&self, command: &CommandLine, ctx: &RunContext) -> Result<CapturedOutput, ExecutionError> {
        self.run_script(&normalize_separators(&command.render()), ctx).await
    }
}

impl CommandRunner for SystemShell {
    async fn run(&self, command: &CommandLine, ctx: &RunContext) -> Result<CapturedOutput, ExecutionError> {
        match ctx.host {
            HostOs::Unix => PosixShell.run(command, ctx).await,
            HostOs::Windows => BatchFile.run(command, ctx).await,
        }
    }
}

/// Writes `content` to a temporary script file that lives until the returned
/// guard is dropped.
fn write_script(content: &str, suffix: &str) -> Result<tempfile::TempPath, ExecutionError> {
    let mut file = tempfile::Builder::new()
        .prefix("itest_")
        .suffix(suffix)
        .tempfile()
        .map_err(ExecutionError::Script)?;
    file.write_all(content.as_bytes()).map_err(ExecutionError::Script)?;
    file.flush().map_err(ExecutionError::Script)?;
    Ok(file.into_temp_path())
}

async fn run_shell(
    mut cmd: tokio::process::Command,
    shell: &str,
    ctx: &RunContext,
) -> Result<CapturedOutput, ExecutionError> {
    cmd.kill_on_drop(true).current_dir(&ctx.workspace_root);
    let (status, text, interrupted) = spawn_and_capture(cmd, &ctx.stop_token)
        .await
        .map_err(|source| ExecutionError::Spawn {
            shell: shell.to_string(),
            source,
        })?;

    let status = status.map_err(|source| ExecutionError::Wait {
        shell: shell.to_string(),
        source,
    })?;
    tracing::debug!(shell, exit_code = ?status.code(), interrupted, "command finished");

    Ok(CapturedOutput {
        text,
        exit_code: status.code(),
        interrupted,
    })
}

/// Spawns a command and captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
/// Cancelling `stop` kills the child; whatever it printed so far is kept.
///
/// # Returns
/// An error if the process could not be started. Otherwise a tuple of the
/// wait status, the combined output and whether the child was interrupted.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。取消 `stop` 会终止子进程，已输出的内容会保留。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
    stop: &CancellationToken,
) -> std::io::Result<(std::io::Result<ExitStatus>, String, bool)> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

    // Use an Arc<Mutex<String>> to allow concurrent writes from stdout and stderr tasks.
    // 使用 Arc<Mutex<String>> 来允许多个任务（stdout 和 stderr）并发写入。
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));
    let stdout_handle = tokio::spawn(collect_lines(stdout, Arc::clone(&output)));
    let stderr_handle = tokio::spawn(collect_lines(stderr, Arc::clone(&output)));

    let (status, interrupted) = tokio::select! {
        status = child.wait() => (status, false),
        _ = stop.cancelled() => {
            tracing::warn!("interrupt received, stopping the running command");
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill the running command");
            }
            (child.wait().await, true)
        }
    };

    // Wait for the readers so that everything the child printed is captured.
    // After an interrupt, grandchildren may still hold the pipes open, so the
    // wait is bounded.
    // 等待读取任务完成，以确保所有输出都被捕获。中断后孙进程可能仍持有管道，因此等待有上限。
    let stdout_abort = stdout_handle.abort_handle();
    let stderr_abort = stderr_handle.abort_handle();
    let readers = async {
        if let Err(e) = stdout_handle.await {
            tracing::warn!(error = %e, "failed to join stdout reader");
        }
        if let Err(e) = stderr_handle.await {
            tracing::warn!(error = %e, "failed to join stderr reader");
        }
    };
    if interrupted {
        if tokio::time::timeout(INTERRUPT_GRACE, readers).await.is_err() {
            tracing::warn!("command output still open after interrupt, keeping what was captured");
            stdout_abort.abort();
            stderr_abort.abort();
        }
    } else {
        readers.await;
    }

    let text = output.lock().await.clone();
    Ok((status, text, interrupted))
}

/// Reads `stream` line by line into `output`, decoding lossily.
async fn collect_lines<R>(stream: R, output: Arc<tokio::sync::Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                let line = line.trim_end_matches(['\n', '\r']);
                let mut output = output.lock().await;
                output.push_str(line);
                output.push('\n');
            }
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading command output");
                break;
            }
        }
    }
}
