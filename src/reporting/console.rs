//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the outcome of a run to the console: a colorful table
//! of the stages that ran and, for a failed run, the line of output that
//! decided it.
//!
//! 此模块将运行结果打印到控制台：已运行阶段的彩色表格，以及对于失败的运行，
//! 决定其结果的那一行输出。

use colored::*;

use crate::core::error::PipelineError;
use crate::core::models::StageStatus;
use crate::core::pipeline::PipelineReport;
use crate::infra::t;

/// Prints a formatted summary of the stages of a run.
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
///   - Passed   | export-projects      |      1.23s  (exit 0)
///   - Passed   | execute              |     12.40s  (exit 0)
///   - Failed   | classify             |      0.00s
/// ```
pub fn print_summary(report: &PipelineReport, locale: &str) {
    println!("\n{}", t!("summary.banner", locale = locale).bold());

    for record in &report.stages {
        let status = match record.status {
            StageStatus::Passed => t!("summary.status_passed", locale = locale).green(),
            StageStatus::Failed => t!("summary.status_failed", locale = locale).red(),
        };
        let exit = record
            .exit_code
            .map(|code| format!(" (exit {})", code))
            .unwrap_or_default();

        println!(
            "  - {:<8} | {:<20} | {:>10}{}",
            status,
            record.stage.to_string(),
            format!("{:.2}s", record.duration.as_secs_f64()),
            exit
        );
    }

    if !report.reports.is_empty() {
        println!("\n{}", t!("summary.reports_banner", locale = locale).bold());
        for descriptor in &report.reports {
            println!("  - {}", descriptor.name.cyan());
        }
    }
}

/// Prints why a run failed. Does nothing for a successful run.
pub fn print_failure_details(report: &PipelineReport, locale: &str) {
    let Some(error) = report.failure() else {
        return;
    };

    println!("\n{}", t!("failure.banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    let headline = match error {
        PipelineError::Configuration(_) => t!("failure.configuration", locale = locale),
        PipelineError::Tool { .. } => t!("failure.tool_error", locale = locale),
        PipelineError::TestFailure { .. } => t!("failure.test_failure", locale = locale),
        PipelineError::MissingLog { .. } => t!("failure.missing_log", locale = locale),
        PipelineError::Report(_) => t!("failure.report", locale = locale),
        PipelineError::Interrupted { .. } => t!("failure.interrupted", locale = locale),
    };
    println!("{}", headline.yellow());
    println!("  {}", error);

    if let PipelineError::Tool { finding, .. } | PipelineError::TestFailure { finding } = error {
        println!(
            "\n--- {} ---\n",
            t!("failure.matched_marker", locale = locale, marker = &finding.marker).yellow()
        );
        println!("{:>6} | {}", finding.line_number, finding.line);
    }
    println!("{}", "-".repeat(80));
}
