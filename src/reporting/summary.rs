//! # JSON Summary Module / JSON 摘要模块
//!
//! Machine-readable summary of a run, for CI steps that come after this one.
//!
//! 运行的机器可读摘要，供后续的 CI 步骤使用。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{ReportDescriptor, StageRecord};
use crate::core::pipeline::PipelineReport;

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub run_id: &'a str,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub stages: &'a [StageRecord],
    pub test_cases: Vec<&'a str>,
    pub reports: &'a [ReportDescriptor],
}

impl<'a> RunSummary<'a> {
    pub fn from_report(report: &'a PipelineReport) -> Self {
        let failure = report.failure();
        Self {
            run_id: &report.run_id,
            succeeded: report.succeeded(),
            failure_category: failure.map(|e| e.category()),
            failure: failure.map(|e| e.to_string()),
            stages: &report.stages,
            test_cases: report.test_cases.iter().collect(),
            reports: &report.reports,
        }
    }
}

/// Writes the summary of `report` as pretty-printed JSON.
pub fn write_json_summary(report: &PipelineReport, path: &Path) -> Result<()> {
    let summary = RunSummary::from_report(report);
    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write run summary: {}", path.display()))
}
