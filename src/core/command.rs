//! # Command Construction Module / 命令构建模块
//!
//! Builds the `itestcli` export command and the `itestrt` execute command as a
//! structured list of `(flag, value)` options. The list is only turned into a
//! single string at the executor boundary.
//!
//! Options are appended in a fixed order, never reordered or deduplicated, and
//! an empty source field always omits its option.
//!
//! 将 `itestcli` 导出命令和 `itestrt` 执行命令构建为结构化的 `(标志, 值)` 选项列表，
//! 仅在执行器边界处才转换为单个字符串。选项按固定顺序追加，从不重排或去重，
//! 空的源字段总是省略对应选项。

use std::fmt;

use crate::core::config::{GlobalConfig, JobConfig};
use crate::core::error::PipelineError;
use crate::core::models::TestCaseSet;
use crate::core::paths::{self, PathResolver};

/// Flags whose values are hidden when a command is echoed.
const SECRET_FLAGS: &[&str] = &["--trdb.password"];

/// One `--flag value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub flag: &'static str,
    pub value: String,
}

/// An executable followed by its options, in the order they were appended.
///
/// 可执行文件及其选项，按追加顺序排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    options: Vec<CommandOption>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            options: Vec::new(),
        }
    }

    /// Appends `flag value`.
    pub fn push(&mut self, flag: &'static str, value: impl Into<String>) -> &mut Self {
        self.options.push(CommandOption {
            flag,
            value: value.into(),
        });
        self
    }

    /// Appends `flag value` unless `value` is empty.
    pub fn push_if_present(&mut self, flag: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(flag, value);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// The flags in order, without values.
    pub fn flags(&self) -> Vec<&'static str> {
        self.options.iter().map(|o| o.flag).collect()
    }

    /// Values of every occurrence of `flag`, in order.
    pub fn values_of(&self, flag: &str) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| o.flag == flag)
            .map(|o| o.value.as_str())
            .collect()
    }

    /// Space-delimited form, the string handed to the shell.
    pub fn render(&self) -> String {
        self.render_with(|_, value| value.to_string())
    }

    /// Like [`render`](Self::render) with secret values replaced, for echoing.
    pub fn render_masked(&self) -> String {
        self.render_with(|flag, value| {
            if SECRET_FLAGS.contains(&flag) {
                "****".to_string()
            } else {
                value.to_string()
            }
        })
    }

    fn render_with<F>(&self, mut value_of: F) -> String
    where
        F: FnMut(&str, &str) -> String,
    {
        let mut line = self.program.clone();
        for option in &self.options {
            line.push(' ');
            line.push_str(option.flag);
            line.push(' ');
            line.push_str(&value_of(option.flag, &option.value));
        }
        line
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Job paths after placeholder and environment resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// iTest workspace; also the export path and the `--itar` source.
    pub workspace: String,
    /// Testbed file, empty when not requested.
    pub testbed: String,
    /// Parameter file, empty when not requested.
    pub param_file: String,
}

impl ResolvedPaths {
    pub fn resolve(job: &JobConfig, resolver: &PathResolver) -> Self {
        let optional = |raw: &str| {
            if raw.is_empty() {
                String::new()
            } else {
                resolver.resolve_expanded(raw)
            }
        };
        Self {
            workspace: resolver.resolve_expanded(&job.workspace),
            testbed: optional(&job.testbed),
            param_file: optional(&job.param_file),
        }
    }
}

/// Assembles command lines from the job and global configuration.
///
/// 根据作业配置和全局配置组装命令行。
#[derive(Debug)]
pub struct CommandBuilder<'a> {
    global: &'a GlobalConfig,
    job: &'a JobConfig,
    paths: &'a ResolvedPaths,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(global: &'a GlobalConfig, job: &'a JobConfig, paths: &'a ResolvedPaths) -> Self {
        Self { global, job, paths }
    }

    /// `itestcli --workspace <ws> --exportPath <ws> --exportProject <projects>`.
    pub fn export(&self, projects: &str) -> CommandLine {
        let mut cmd = CommandLine::new(self.global.cli_executable());
        cmd.push("--workspace", self.paths.workspace.as_str())
            .push("--exportPath", self.paths.workspace.as_str())
            .push_if_present("--exportProject", projects);
        cmd
    }

    /// The execute command up to and including the `--test` options, plus the
    /// test cases in the order they were emitted.
    pub fn execute(&self) -> Result<(CommandLine, TestCaseSet), PipelineError> {
        let mut cmd = CommandLine::new(self.global.rt_executable());
        cmd.push("--licenseServer", self.global.license_server.address())
            .push("--itar", self.paths.workspace.as_str());

        if !self.paths.testbed.is_empty() {
            cmd.push("--testbed", format!("file:/{}", self.paths.testbed));
        }
        for param in self.job.param_entries() {
            cmd.push("--param", param);
        }
        if !self.paths.param_file.is_empty() {
            cmd.push("--paramfile", format!("file:/{}", self.paths.param_file));
        }

        let mut test_cases = Vec::new();
        for entry in self.job.testcase_entries() {
            let uri = paths::test_case_uri(&entry)?;
            cmd.push("--test", uri.as_str());
            test_cases.push(uri);
        }

        Ok((cmd, TestCaseSet::new(test_cases)))
    }

    /// Appends `--report` and, when a database user is configured, the report
    /// database options.
    pub fn append_report_options(&self, cmd: &mut CommandLine, report_target: &str) {
        cmd.push("--report", report_target);

        let db = &self.global.database;
        if db.username.is_empty() {
            return;
        }
        cmd.push("--trdb.user", db.username.as_str())
            .push("--trdb.password", db.password.as_str())
            .push_if_present("--tag", &self.job.db_custom_tag)
            .push("--host", self.global.license_server.host.as_str());

        if !db.uri.is_empty() {
            cmd.push("--uri", db.uri.as_str());
            return;
        }
        cmd.push("--catalog", db.name.as_str())
            .push("--dbtype", db.db_type.as_str())
            .push("--ipaddr", db.host.as_str())
            .push("--trdb.port", db.port.as_str());
    }
}

/// `--report` target: `<workspace file URI>/jenkins_test_reports_<run-id>/{tcfilename}.html`.
pub fn report_target(workspace_uri: &url::Url, run_id: &str) -> String {
    let base = workspace_uri.as_str();
    let separator = if base.ends_with('/') { "" } else { "/" };
    format!(
        "{}{}{}{}/{{tcfilename}}.html",
        base,
        separator,
        crate::core::models::REPORT_DIR_PREFIX,
        run_id
    )
}
