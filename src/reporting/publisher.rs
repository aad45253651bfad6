//! # Report Publishing Module / 报告发布模块
//!
//! Hands report descriptors to whatever serves the reports. The default
//! [`ArchivePublisher`] copies each report into an archive directory and writes
//! an index wrapper next to it.
//!
//! 将报告描述符交给提供报告服务的组件。默认的 [`ArchivePublisher`] 将每个报告复制到归档目录，
//! 并在其旁边写入索引包装页。

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::PipelineError;
use crate::core::models::{ReportDescriptor, RunContext};
use crate::infra;
use crate::reporting::html::{WRAPPER_NAME, render_wrapper};

/// Publishes a run's reports.
///
/// 发布一次运行的报告。
pub trait ReportPublisher {
    fn publish(&self, reports: &[ReportDescriptor], ctx: &RunContext) -> Result<(), PipelineError>;
}

/// Archives reports under a root directory:
/// `<root>/<run-id>/htmlreports/<name>` for reports kept per run,
/// `<root>/htmlreports/<name>` for reports that only keep the latest run.
///
/// 在根目录下归档报告：按运行保留的报告放在 `<root>/<run-id>/htmlreports/<name>`，
/// 只保留最新运行的报告放在 `<root>/htmlreports/<name>`。
#[derive(Debug, Clone)]
pub struct ArchivePublisher {
    archive_root: PathBuf,
    locale: String,
}

impl ArchivePublisher {
    pub fn new(archive_root: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            archive_root: archive_root.into(),
            locale: locale.into(),
        }
    }

    /// Directory a report is archived into.
    pub fn archive_dir(&self, report: &ReportDescriptor, run_id: &str) -> PathBuf {
        let root = if report.keep_all {
            self.archive_root.join(run_id)
        } else {
            self.archive_root.clone()
        };
        root.join("htmlreports").join(report.sanitized_name())
    }

    fn archive(&self, report: &ReportDescriptor, run_id: &str) -> Result<(), PipelineError> {
        let target = self.archive_dir(report, run_id);
        let mut archived = Vec::new();

        for name in report.included_file_names() {
            let source = report.source_dir.join(name);
            if !source.is_file() {
                if report.allow_missing {
                    tracing::warn!(report = %report.name, file = %source.display(), "report file missing, skipped");
                    continue;
                }
                return Err(PipelineError::Report(format!(
                    "report file not found: {}",
                    source.display()
                )));
            }
            infra::fs::copy_into(&source, &target).map_err(|e| PipelineError::Report(format!("{:#}", e)))?;
            archived.push(name.to_string());
        }

        if archived.is_empty() {
            return Ok(());
        }
        write_wrapper(&target, &render_wrapper(report, &archived, run_id, &self.locale))?;
        tracing::info!(report = %report.name, dir = %target.display(), "report archived");
        Ok(())
    }
}

impl ReportPublisher for ArchivePublisher {
    fn publish(&self, reports: &[ReportDescriptor], ctx: &RunContext) -> Result<(), PipelineError> {
        for report in reports {
            self.archive(report, &ctx.run_id)?;
        }
        Ok(())
    }
}

fn write_wrapper(dir: &Path, page: &str) -> Result<(), PipelineError> {
    let path = dir.join(WRAPPER_NAME);
    fs::write(&path, page)
        .map_err(|e| PipelineError::Report(format!("failed to write {}: {}", path.display(), e)))
}
