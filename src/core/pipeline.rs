//! # Pipeline Module / 流水线模块
//!
//! Sequences one run:
//!
//! ```text
//! ExportProjects -> [InitReport] -> Execute -> [FinalizeReport] -> Classify
//! ```
//!
//! Steps run strictly one after another and the first failure ends the run.
//! Every command's output is appended to the execution log, and the whole log
//! is scanned for tool errors after each command. The test-failure check is
//! applied once, after the reports have been published.
//!
//! 按顺序执行一次运行。各步骤严格串行，第一次失败即结束运行。每条命令的输出都追加到执行日志，
//! 并在每条命令之后扫描整个日志中的工具错误。测试失败检查在报告发布后执行一次。

use colored::*;
use std::time::Instant;
use url::Url;

use crate::core::classifier::{self, Verdict};
use crate::core::command::{self, CommandBuilder, CommandLine, ResolvedPaths};
use crate::core::config::{GlobalConfig, JobConfig};
use crate::core::error::PipelineError;
use crate::core::models::{ReportDescriptor, RunContext, Stage, StageRecord, StageStatus, TestCaseSet};
use crate::core::paths::PathResolver;
use crate::infra::command::CommandRunner;
use crate::infra::log::ExecutionLog;
use crate::infra::{self, t};
use crate::reporting::publisher::ReportPublisher;

/// Project exported before reports can be generated.
pub const RESOURCES_PROJECT: &str = "resources";

/// Everything a run produced. Success collapses to [`succeeded`](Self::succeeded).
///
/// 一次运行产生的全部结果。成功与否归结为 [`succeeded`](Self::succeeded)。
#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: String,
    pub stages: Vec<StageRecord>,
    pub test_cases: TestCaseSet,
    pub reports: Vec<ReportDescriptor>,
    pub outcome: Result<(), PipelineError>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        self.outcome.as_ref().err()
    }
}

/// Collected while the stages run.
#[derive(Default)]
struct RunState {
    stages: Vec<StageRecord>,
    test_cases: TestCaseSet,
    reports: Vec<ReportDescriptor>,
}

impl RunState {
    fn record<T>(&mut self, stage: Stage, started: Instant, result: &Result<T, PipelineError>, exit_code: Option<i32>) {
        self.stages.push(StageRecord {
            stage,
            status: if result.is_ok() { StageStatus::Passed } else { StageStatus::Failed },
            duration: started.elapsed(),
            exit_code,
        });
    }
}

/// Drives the export and execute tools for one job.
///
/// 为一个作业驱动导出和执行工具。
pub struct Orchestrator<'a, R, P> {
    global: &'a GlobalConfig,
    runner: R,
    publisher: P,
    locale: String,
}

impl<'a, R, P> Orchestrator<'a, R, P>
where
    R: CommandRunner,
    P: ReportPublisher,
{
    pub fn new(global: &'a GlobalConfig, runner: R, publisher: P) -> Self {
        Self {
            global,
            runner,
            publisher,
            locale: "en".to_string(),
        }
    }

    /// Locale of the console messages.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Runs the whole pipeline for `job`.
    pub async fn run(&self, job: &JobConfig, ctx: &RunContext) -> PipelineReport {
        let mut state = RunState::default();
        let outcome = self.run_stages(job, ctx, &mut state).await;

        if let Err(e) = &outcome {
            tracing::info!(run_id = %ctx.run_id, category = e.category(), "run failed: {}", e);
        }
        PipelineReport {
            run_id: ctx.run_id.clone(),
            stages: state.stages,
            test_cases: state.test_cases,
            reports: state.reports,
            outcome,
        }
    }

    async fn run_stages(&self, job: &JobConfig, ctx: &RunContext, state: &mut RunState) -> Result<(), PipelineError> {
        let log = ExecutionLog::new(&ctx.log_path);
        let resolver = PathResolver::new(ctx.workspace_str());
        let paths = ResolvedPaths::resolve(job, &resolver);
        let builder = CommandBuilder::new(self.global, job, &paths);

        let (mut execute_command, test_cases) = builder.execute()?;
        state.test_cases = test_cases.clone();

        let started = Instant::now();
        let (result, exit_code) = self
            .run_command(Stage::ExportProjects, &builder.export(&job.export_projects()), &log, ctx)
            .await;
        state.record(Stage::ExportProjects, started, &result, exit_code);
        result?;

        if job.report_required {
            let started = Instant::now();
            let (result, exit_code) = self.init_report(&builder, &mut execute_command, &log, ctx).await;
            state.record(Stage::InitReport, started, &result, exit_code);
            result?;
        }

        let started = Instant::now();
        let (result, exit_code) = self.run_command(Stage::Execute, &execute_command, &log, ctx).await;
        state.record(Stage::Execute, started, &result, exit_code);
        let verdict = result?;

        if job.report_required {
            let started = Instant::now();
            let result = self.finalize_report(&test_cases, ctx);
            state.record(Stage::FinalizeReport, started, &result, None);
            state.reports = result?;
        }

        let started = Instant::now();
        let result = match verdict {
            Verdict::TestFailure(finding) => Err(PipelineError::TestFailure { finding }),
            _ => Ok(()),
        };
        state.record(Stage::Classify, started, &result, None);
        result
    }

    /// Exports the resources project, creates the report directory and adds the
    /// report destination options to the execute command.
    async fn init_report(
        &self,
        builder: &CommandBuilder<'_>,
        execute_command: &mut CommandLine,
        log: &ExecutionLog,
        ctx: &RunContext,
    ) -> (Result<(), PipelineError>, Option<i32>) {
        let (result, exit_code) = self
            .run_command(Stage::InitReport, &builder.export(RESOURCES_PROJECT), log, ctx)
            .await;
        if let Err(e) = result {
            return (Err(e), exit_code);
        }

        let result = prepare_report_target(ctx).map(|target| {
            println!("{}", t!("run.report_dir_ready", locale = &self.locale, id = &ctx.run_id).cyan());
            builder.append_report_options(execute_command, &target);
        });
        (result, exit_code)
    }

    /// Builds one descriptor per test case and hands them to the publisher.
    fn finalize_report(&self, test_cases: &TestCaseSet, ctx: &RunContext) -> Result<Vec<ReportDescriptor>, PipelineError> {
        self.ensure_not_interrupted(Stage::FinalizeReport, ctx)?;
        let source_dir = infra::fs::report_dir(&ctx.workspace_root, &ctx.run_id);
        let reports: Vec<ReportDescriptor> = test_cases
            .iter()
            .map(|test_case| ReportDescriptor::for_test_case(test_case, source_dir.clone()))
            .collect();

        println!(
            "{}",
            t!("run.publishing_reports", locale = &self.locale, count = reports.len()).blue()
        );
        self.publisher.publish(&reports, ctx)?;
        Ok(reports)
    }

    /// Runs one command, appends its output to the log and scans the log.
    /// Returns the verdict unless it is a tool error.
    async fn run_command(
        &self,
        stage: Stage,
        command: &CommandLine,
        log: &ExecutionLog,
        ctx: &RunContext,
    ) -> (Result<Verdict, PipelineError>, Option<i32>) {
        if let Err(e) = self.ensure_not_interrupted(stage, ctx) {
            return (Err(e), None);
        }

        println!(
            "{}",
            t!("run.stage_started", locale = &self.locale, stage = stage).blue()
        );
        println!(
            "{} {}",
            t!("run.command_prefix", locale = &self.locale).blue(),
            command.render_masked()
        );

        let mut exit_code = None;
        let mut interrupted = false;
        match self.runner.run(command, ctx).await {
            Ok(captured) => {
                if !captured.text.trim().is_empty() {
                    println!("{}", captured.text.trim_end());
                }
                if let Err(e) = log.append(&captured.text) {
                    tracing::error!(path = %log.path().display(), error = %e, "failed to append to execution log");
                }
                exit_code = captured.exit_code;
                interrupted = captured.interrupted;
            }
            Err(e) => {
                tracing::warn!(%stage, error = %e, "command did not run, deferring to output classification");
                eprintln!(
                    "{}",
                    t!("run.execution_error", locale = &self.locale, stage = stage, error = e).yellow()
                );
            }
        }

        let verdict = match log.read() {
            Ok(text) => classifier::classify(&text),
            Err(e) => return (Err(e), exit_code),
        };

        let result = match verdict {
            Verdict::ToolError(finding) => Err(PipelineError::Tool { stage, finding }),
            _ if interrupted => Err(PipelineError::Interrupted { stage }),
            other => Ok(other),
        };
        (result, exit_code)
    }

    fn ensure_not_interrupted(&self, stage: Stage, ctx: &RunContext) -> Result<(), PipelineError> {
        if ctx.stop_token.is_cancelled() {
            return Err(PipelineError::Interrupted { stage });
        }
        Ok(())
    }
}

/// Creates the run's report directory and returns the `--report` target.
fn prepare_report_target(ctx: &RunContext) -> Result<String, PipelineError> {
    infra::fs::create_report_dir(&ctx.workspace_root, &ctx.run_id)
        .map_err(|e| PipelineError::Report(format!("{:#}", e)))?;
    let workspace_uri = Url::from_directory_path(&ctx.workspace_root).map_err(|_| {
        PipelineError::Report(format!(
            "workspace root is not an absolute path: {}",
            ctx.workspace_root.display()
        ))
    })?;
    Ok(command::report_target(&workspace_uri, &ctx.run_id))
}
