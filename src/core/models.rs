//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the pipeline: the run
//! context handed over by the host, the stages of a run and their records, the
//! ordered test-case set and the report descriptors produced for publishing.
//!
//! 此模块定义了流水线共享的数据结构：宿主提供的运行上下文、运行阶段及其记录、
//! 有序的测试用例集合以及为发布生成的报告描述符。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Name prefix of every published report link.
pub const REPORT_NAME_PREFIX: &str = "Spirent iTest Report";

/// Directory prefix, inside the workspace, that holds one run's HTML reports.
pub const REPORT_DIR_PREFIX: &str = "jenkins_test_reports_";

/// Operating system family of the machine that runs the commands.
/// It only selects the shell wrapper.
///
/// 执行命令的机器的操作系统族。它只决定使用哪种 shell 包装。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Unix,
    Windows,
}

impl HostOs {
    /// The family of the current process.
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }
}

/// Everything the build host supplies for one run.
///
/// 构建宿主为一次运行提供的全部信息。
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Absolute root of the job workspace. / 作业工作区的绝对根目录。
    pub workspace_root: PathBuf,
    /// Unique identifier of this run. / 本次运行的唯一标识。
    pub run_id: String,
    /// File that receives the captured tool output. / 接收工具输出的日志文件。
    pub log_path: PathBuf,
    /// Shell family used to run commands. / 用于运行命令的 shell 族。
    pub host: HostOs,
    /// Cancelled when the host asks the run to stop. / 宿主要求停止运行时取消。
    pub stop_token: CancellationToken,
}

impl RunContext {
    pub fn new(workspace_root: PathBuf, run_id: impl Into<String>, log_path: PathBuf) -> Self {
        Self {
            workspace_root,
            run_id: run_id.into(),
            log_path,
            host: HostOs::current(),
            stop_token: CancellationToken::new(),
        }
    }

    /// The workspace root as a string, the form used inside command lines.
    pub fn workspace_str(&self) -> String {
        self.workspace_root.to_string_lossy().into_owned()
    }
}

/// The steps of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    ExportProjects,
    InitReport,
    Execute,
    FinalizeReport,
    Classify,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ExportProjects => "export-projects",
            Stage::InitReport => "init-report",
            Stage::Execute => "execute",
            Stage::FinalizeReport => "finalize-report",
            Stage::Classify => "classify",
        };
        f.write_str(name)
    }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Passed,
    Failed,
}

/// One line of the run summary.
///
/// 运行摘要中的一行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Exit code of the shell, when a command ran and exited normally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// Ordered test-case identifiers in the tool's URI form.
/// The order is the order of the `--test` options and of the report descriptors.
///
/// 以工具 URI 形式表示的有序测试用例标识。
/// 顺序与 `--test` 选项以及报告描述符的顺序一致。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseSet(Vec<String>);

impl TestCaseSet {
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Base name of a test-case identifier without directories or extension.
/// `project://suite/case1.xml` becomes `case1`.
pub fn test_case_basename(id: &str) -> &str {
    let file = id.rsplit(['/', '\\']).next().unwrap_or(id);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}

/// Metadata of one HTML report to publish.
///
/// 一个待发布 HTML 报告的元数据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    /// Display name of the report link. / 报告链接的显示名称。
    pub name: String,
    /// Directory the tool wrote the report into. / 工具写入报告的目录。
    pub source_dir: PathBuf,
    /// File(s) inside `source_dir` to publish, comma separated. / 要发布的文件，逗号分隔。
    pub included_files: String,
    /// Archive the report for every run instead of only the latest one.
    pub keep_all: bool,
    /// A missing report does not fail the run.
    pub allow_missing: bool,
}

impl ReportDescriptor {
    /// One descriptor per test case, named `<prefix>-<basename>`.
    pub fn for_test_case(test_case: &str, source_dir: PathBuf) -> Self {
        let basename = test_case_basename(test_case);
        Self {
            name: format!("{}-{}", REPORT_NAME_PREFIX, basename),
            source_dir,
            included_files: format!("{}.html", basename),
            keep_all: true,
            allow_missing: true,
        }
    }

    /// The name with spaces replaced, safe for directory names and URLs.
    pub fn sanitized_name(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// The included file names, split on commas with whitespace trimmed.
    pub fn included_file_names(&self) -> impl Iterator<Item = &str> {
        self.included_files
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}
