// Shared test helpers for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use itest_runner::command::CommandLine;
use itest_runner::config::{GlobalConfig, JobConfig, LicenseServerConfig};
use itest_runner::core::error::{ExecutionError, PipelineError};
use itest_runner::core::models::{ReportDescriptor, RunContext};
use itest_runner::infra::command::{CapturedOutput, CommandRunner};
use itest_runner::reporting::ReportPublisher;
use tempfile::{tempdir, TempDir};

/// What the fake runner does for one command.
pub enum Reply {
    Output(String),
    Interrupted(String),
    Fail,
}

/// A command runner that records every command and answers from a script.
/// Commands beyond the script succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    commands: Mutex<Vec<CommandLine>>,
}

impl ScriptedRunner {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.commands().iter().map(|c| c.program().to_string()).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        command: &CommandLine,
        ctx: &RunContext,
    ) -> impl Future<Output = Result<CapturedOutput, ExecutionError>> + Send {
        self.commands.lock().unwrap().push(command.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        let result = match reply {
            None => Ok(CapturedOutput::default()),
            Some(Reply::Output(text)) => Ok(CapturedOutput {
                text,
                exit_code: Some(0),
                interrupted: false,
            }),
            Some(Reply::Interrupted(text)) => {
                ctx.stop_token.cancel();
                Ok(CapturedOutput {
                    text,
                    exit_code: None,
                    interrupted: true,
                })
            }
            Some(Reply::Fail) => Err(ExecutionError::Spawn {
                shell: "sh".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "sh not found"),
            }),
        };
        async move { result }
    }
}

/// A publisher that only remembers what it was given.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<ReportDescriptor>>,
    fail_with: Option<String>,
}

impl RecordingPublisher {
    pub fn failing(message: &str) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn published(&self) -> Vec<ReportDescriptor> {
        self.published.lock().unwrap().clone()
    }
}

impl ReportPublisher for RecordingPublisher {
    fn publish(&self, reports: &[ReportDescriptor], _ctx: &RunContext) -> Result<(), PipelineError> {
        if let Some(message) = &self.fail_with {
            return Err(PipelineError::Report(message.clone()));
        }
        self.published.lock().unwrap().extend_from_slice(reports);
        Ok(())
    }
}

pub fn global_config() -> GlobalConfig {
    GlobalConfig {
        cli_path: "/opt/itest/bin/itestcli".to_string(),
        rt_path: "/opt/itest/bin/itestrt".to_string(),
        license_server: LicenseServerConfig {
            host: "licsrv".to_string(),
            port: "27000".to_string(),
        },
        ..GlobalConfig::default()
    }
}

pub fn job_config(testcases: &str) -> JobConfig {
    JobConfig {
        workspace: "${WORKSPACE}/itest_ws".to_string(),
        projects: "suite".to_string(),
        testcases: testcases.to_string(),
        ..JobConfig::default()
    }
}

/// A temporary job workspace and a run context pointing into it.
pub fn run_context(run_id: &str) -> (TempDir, RunContext) {
    let dir = tempdir().expect("Failed to create temporary directory");
    let root = fs::canonicalize(dir.path()).expect("Failed to resolve temporary directory");
    let log_path = root.join(format!("itest_run_{}.log", run_id));
    (dir, RunContext::new(root, run_id, log_path))
}

/// Writes `content` to `dir/name`, creating `dir`.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
