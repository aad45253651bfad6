//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it plays the part of the build
//! host, turning the command line and environment into a [`RunContext`] and
//! handing it to the [`Orchestrator`].
//!
//! 此模块实现 `run` 命令：它扮演构建宿主的角色，将命令行和环境变量转换为
//! [`RunContext`] 并交给 [`Orchestrator`]。

use anyhow::{Context, Result};
use colored::*;
use std::env;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{GlobalConfig, JobConfig},
        models::RunContext,
        pipeline::Orchestrator,
    },
    infra::{command::SystemShell, fs, log::ExecutionLog, t},
    reporting::{
        console::{print_failure_details, print_summary},
        publisher::ArchivePublisher,
        summary::write_json_summary,
    },
};

/// Directory, inside the workspace, that receives archived reports by default.
pub const DEFAULT_ARCHIVE_DIR: &str = "itest_archive";

/// Arguments of the `run` command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub global_config: PathBuf,
    pub workspace_root: Option<PathBuf>,
    pub run_id: Option<String>,
    pub log_file: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    /// Language given with `--lang`; otherwise the job's `language` applies.
    pub language: Option<String>,
}

/// Executes the run command.
///
/// # Returns
/// `Ok(true)` when every stage passed, `Ok(false)` when the run failed.
/// Errors are returned only when the run could not be set up.
pub async fn execute(args: RunArgs) -> Result<bool> {
    let job = JobConfig::load(&args.config)
        .with_context(|| t!("config_read_failed_path", path = args.config.display()).to_string())?;

    let locale = match &args.language {
        Some(language) => crate::select_locale(language),
        None => crate::select_locale(&job.language),
    };
    rust_i18n::set_locale(&locale);

    let global = GlobalConfig::load(&args.global_config).with_context(|| {
        t!("config_read_failed_path", locale = &locale, path = args.global_config.display()).to_string()
    })?;

    if let Err(e) = job.validate().and_then(|_| global.validate_for_run()) {
        eprintln!("{} {}", t!("config_invalid", locale = &locale).red().bold(), e);
        return Ok(false);
    }

    let workspace_root = resolve_workspace_root(args.workspace_root.as_deref())?;
    let run_id = args.run_id.clone().unwrap_or_else(default_run_id);
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| workspace_root.join(format!("itest_run_{}.log", run_id)));
    ExecutionLog::fresh(&log_path)
        .with_context(|| t!("log_prepare_failed", locale = &locale, path = log_path.display()).to_string())?;

    println!(
        "{}",
        t!("workspace_detected", locale = &locale, path = workspace_root.display()).cyan()
    );
    println!("{}", t!("run_id_selected", locale = &locale, id = &run_id).cyan());
    tracing::info!(run_id = %run_id, workspace = %workspace_root.display(), log = %log_path.display(), "starting run");

    let mut ctx = RunContext::new(workspace_root.clone(), run_id, log_path);
    ctx.stop_token = setup_signal_handler(&locale)?;

    let archive_root = args
        .archive_dir
        .clone()
        .unwrap_or_else(|| workspace_root.join(DEFAULT_ARCHIVE_DIR));
    let orchestrator = Orchestrator::new(&global, SystemShell, ArchivePublisher::new(archive_root, &locale))
        .with_locale(&locale);
    let report = orchestrator.run(&job, &ctx).await;

    print_summary(&report, &locale);
    print_failure_details(&report, &locale);

    if let Some(path) = &args.summary_json {
        write_json_summary(&report, path)?;
        println!("{}", t!("summary_written", locale = &locale, path = path.display()).cyan());
    }

    if report.succeeded() {
        println!("\n{}", t!("run_succeeded", locale = &locale).green().bold());
    } else {
        println!("\n{}", t!("run_failed", locale = &locale).red().bold());
    }
    Ok(report.succeeded())
}

/// `--workspace-root`, then `$WORKSPACE`, then the current directory; made absolute.
fn resolve_workspace_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os("WORKSPACE").filter(|v| !v.is_empty()) {
            Some(value) => PathBuf::from(value),
            None => env::current_dir().context("Failed to read the current directory")?,
        },
    };
    if !fs::is_directory(&root) {
        anyhow::bail!(t!("workspace_not_found", path = root.display()).to_string());
    }
    fs::absolute_path(&root)
}

/// `$BUILD_ID`, then `$BUILD_NUMBER`, then a local timestamp.
fn default_run_id() -> String {
    ["BUILD_ID", "BUILD_NUMBER"]
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string())
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler(locale: &str) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            return;
        }
        println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
        token_clone.cancel();
    });

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_workspace_root_must_exist() {
        let missing = Path::new("/definitely/not/a/workspace");
        assert!(resolve_workspace_root(Some(missing)).is_err());

        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_workspace_root(Some(dir.path())).unwrap();
        assert!(resolved.is_absolute());
    }
}
