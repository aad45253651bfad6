//! # Error Types / 错误类型
//!
//! Failure taxonomy for a pipeline run. Every variant of [`PipelineError`] is
//! terminal for the current run; nothing is retried.
//!
//! 流水线运行的失败分类。[`PipelineError`] 的每个变体对当前运行都是终止性的，不会重试。

use std::path::PathBuf;
use thiserror::Error;

use crate::core::classifier::Finding;
use crate::core::models::Stage;

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required field is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The export or execute tool reported a failure in its output.
    #[error("tool error during {stage}: line {}: {}", finding.line_number, finding.line)]
    Tool { stage: Stage, finding: Finding },

    /// At least one test case finished with a failed execution status.
    #[error("test failure: line {}: {}", finding.line_number, finding.line)]
    TestFailure { finding: Finding },

    /// The execution log could not be read back for classification.
    #[error("execution log not found: {}", path.display())]
    MissingLog { path: PathBuf },

    /// Creating the report directory or publishing reports failed.
    #[error("report error: {0}")]
    Report(String),

    /// The host interrupted the run.
    #[error("run interrupted during {stage}")]
    Interrupted { stage: Stage },
}

impl PipelineError {
    /// Short, stable category name used in summaries.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Tool { .. } => "tool_error",
            PipelineError::TestFailure { .. } => "test_failure",
            PipelineError::MissingLog { .. } => "missing_log",
            PipelineError::Report(_) => "report_error",
            PipelineError::Interrupted { .. } => "interrupted",
        }
    }
}

/// Failures of the execution layer. These are logged and never abort the
/// pipeline by themselves; the outcome is decided by classifying the log.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to write command script: {0}")]
    Script(#[source] std::io::Error),

    #[error("failed to start '{shell}': {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for '{shell}': {source}")]
    Wait {
        shell: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading or saving configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    #[error(transparent)]
    Serialization(#[from] toml::ser::Error),
}
