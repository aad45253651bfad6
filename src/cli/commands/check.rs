//! # Check Command Module / 检查命令模块
//!
//! Validates the configuration before a job uses it: executable paths, the
//! license server and report database connections, and optionally a job file.
//!
//! 在作业使用配置之前对其进行验证：可执行文件路径、许可证服务器和报告数据库连接，以及可选的作业文件。

use anyhow::{Context, Result};
use colored::*;
use std::fmt::Display;
use std::path::Path;

use crate::core::config::{GlobalConfig, JobConfig};
use crate::infra::{net, t};

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Skipped,
    Failed(String),
}

impl CheckOutcome {
    fn from_result<E: Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => CheckOutcome::Passed,
            Err(e) => CheckOutcome::Failed(e.to_string()),
        }
    }
}

/// Runs every check and prints one line per check.
///
/// # Returns
/// `Ok(true)` when no check failed.
pub async fn execute(global_path: &Path, job_path: Option<&Path>, locale: &str) -> Result<bool> {
    let global = GlobalConfig::load(global_path)
        .with_context(|| t!("config_read_failed_path", locale = locale, path = global_path.display()).to_string())?;

    let mut outcomes = vec![
        (
            t!("check.executables", locale = locale).to_string(),
            CheckOutcome::from_result(net::check_executable_paths(&global)),
        ),
        (
            t!("check.license_server", locale = locale).to_string(),
            CheckOutcome::from_result(net::check_license_server(&global).await),
        ),
        (
            t!("check.database", locale = locale).to_string(),
            check_database(&global).await,
        ),
    ];

    if let Some(path) = job_path {
        let outcome = match JobConfig::load(path) {
            Ok(job) => CheckOutcome::from_result(job.validate()),
            Err(e) => CheckOutcome::Failed(e.to_string()),
        };
        outcomes.push((t!("check.job", locale = locale, path = path.display()).to_string(), outcome));
    }

    for (label, outcome) in &outcomes {
        match outcome {
            CheckOutcome::Passed => println!("  {} {}", "✔".green(), label),
            CheckOutcome::Skipped => {
                println!("  {} {} ({})", "-".dimmed(), label, t!("check.skipped", locale = locale).dimmed())
            }
            CheckOutcome::Failed(reason) => println!("  {} {}: {}", "✘".red(), label, reason.red()),
        }
    }

    Ok(!outcomes
        .iter()
        .any(|(_, outcome)| matches!(outcome, CheckOutcome::Failed(_))))
}

/// The database is only checked when one is configured.
async fn check_database(global: &GlobalConfig) -> CheckOutcome {
    let db = &global.database;
    if db.uri.is_empty() && db.host.is_empty() && db.username.is_empty() {
        return CheckOutcome::Skipped;
    }
    CheckOutcome::from_result(net::check_database(db).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_database_is_skipped() {
        assert_eq!(check_database(&GlobalConfig::default()).await, CheckOutcome::Skipped);
    }

    #[tokio::test]
    async fn database_without_credentials_fails() {
        let mut global = GlobalConfig::default();
        global.database.uri = "jdbc:mysql://db.example:3306/results".to_string();
        assert!(matches!(check_database(&global).await, CheckOutcome::Failed(_)));
    }
}
