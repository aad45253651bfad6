//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, a small wizard that writes an
//! `ITestJob.toml` and an `ITestGlobal.toml` into the current directory.
//! With `--non-interactive` the commented templates are written as they are;
//! existing files are kept unless `--force` is given.
//!
//! 此模块实现 `init` 命令，一个在当前目录写入 `ITestJob.toml` 和 `ITestGlobal.toml`
//! 的小向导。使用 `--non-interactive` 时直接写入带注释的模板；除非指定 `--force`，否则保留已有文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{
    DEFAULT_GLOBAL_CONFIG, DEFAULT_JOB_CONFIG, DatabaseConfig, GlobalConfig, JobConfig, LicenseServerConfig,
};
use crate::infra::t;

pub const JOB_TEMPLATE: &str = r#"# iTest Job Configuration / iTest 作业配置

# Language for console messages / 控制台消息的语言
language = "en"

# iTest workspace: absolute, relative to the job workspace, or using ${WORKSPACE}
# iTest 工作区：绝对路径、相对于作业工作区的路径，或使用 ${WORKSPACE}
workspace = "${WORKSPACE}/itest_workspace"

# Comma-separated projects to export / 要导出的项目，逗号分隔
projects = "suite"

# Comma-separated test cases / 测试用例，逗号分隔
testcases = "project://suite/case1.fftc"

# Optional testbed file / 可选的测试床文件
testbed = ""

# Optional comma-separated key=value parameters / 可选的 key=value 参数，逗号分隔
params = ""

# Optional parameter file / 可选的参数文件
param_file = ""

# Generate and publish HTML reports / 生成并发布 HTML 报告
report_required = false

# Tag stored with the results in the report database / 存入报告数据库的结果标签
db_custom_tag = ""
"#;

pub const GLOBAL_TEMPLATE: &str = r#"# iTest Global Configuration / iTest 全局配置

# Empty paths use itestcli / itestrt from PATH / 路径为空时使用 PATH 中的 itestcli / itestrt
cli_path = ""
rt_path = ""

[license_server]
host = ""
port = ""

# Report database, used only when a job generates reports
# 报告数据库，仅在作业生成报告时使用
[database]
name = ""
db_type = ""
username = ""
password = ""
uri = ""
host = ""
port = ""
"#;

/// Runs the wizard that writes `ITestJob.toml` and `ITestGlobal.toml`.
///
/// 运行写入 `ITestJob.toml` 和 `ITestGlobal.toml` 的向导。
pub fn run_init_wizard(language: &str, non_interactive: bool, force: bool) -> Result<()> {
    let job_path = Path::new(DEFAULT_JOB_CONFIG);
    let global_path = Path::new(DEFAULT_GLOBAL_CONFIG);
    let theme = ColorfulTheme::default();

    if non_interactive {
        write_templates(Path::new(""), force, language)?;
        println!("{}", t!("init_usage_hint", locale = language));
        return Ok(());
    }

    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
    println!("{}", t!("init_wizard_description", locale = language));

    if confirm_overwrite(&theme, job_path, language)? {
        let job = prompt_job(&theme, language)?;
        let content = toml::to_string_pretty(&job)
            .context(t!("init_serialize_failed", locale = language).to_string())?;
        write_file(job_path, &content, language)?;
    }

    if confirm_overwrite(&theme, global_path, language)? {
        let global = prompt_global(&theme, language)?;
        let content = toml::to_string_pretty(&global)
            .context(t!("init_serialize_failed", locale = language).to_string())?;
        write_file(global_path, &content, language)?;
    }

    println!("{}", t!("init_usage_hint", locale = language));
    Ok(())
}

/// Writes both templates into `dir`. Existing files are only replaced when `force` is set.
fn write_templates(dir: &Path, force: bool, language: &str) -> Result<()> {
    for (name, template) in [(DEFAULT_JOB_CONFIG, JOB_TEMPLATE), (DEFAULT_GLOBAL_CONFIG, GLOBAL_TEMPLATE)] {
        let path = dir.join(name);
        if path.exists() && !force {
            println!(
                "{}",
                t!("init_skipped_existing", locale = language, path = path.display()).yellow()
            );
            continue;
        }
        write_file(&path, template, language)?;
    }
    Ok(())
}

/// `true` when `path` may be written.
fn confirm_overwrite(theme: &ColorfulTheme, path: &Path, language: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let confirmation = Confirm::with_theme(theme)
        .with_prompt(t!("init_overwrite_prompt", locale = language, path = path.display()))
        .default(false)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    if !confirmation {
        println!("{}", t!("init_skipped", locale = language, path = path.display()).yellow());
    }
    Ok(confirmation)
}

fn prompt_text(theme: &ColorfulTheme, prompt: String, default: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .default(default.to_string())
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_job(theme: &ColorfulTheme, language: &str) -> Result<JobConfig> {
    let workspace = prompt_text(
        theme,
        t!("init_workspace_prompt", locale = language).to_string(),
        "${WORKSPACE}/itest_workspace",
    )?;
    let projects = prompt_text(theme, t!("init_projects_prompt", locale = language).to_string(), "suite")?;
    let testcases = prompt_text(
        theme,
        t!("init_testcases_prompt", locale = language).to_string(),
        "project://suite/case1.fftc",
    )?;
    let report_required = Confirm::with_theme(theme)
        .with_prompt(t!("init_report_prompt", locale = language))
        .default(false)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    Ok(JobConfig {
        language: language.to_string(),
        workspace,
        projects,
        testcases,
        report_required,
        ..JobConfig::default()
    })
}

fn prompt_global(theme: &ColorfulTheme, language: &str) -> Result<GlobalConfig> {
    let cli_path = prompt_text(theme, t!("init_cli_path_prompt", locale = language).to_string(), "")?;
    let rt_path = prompt_text(theme, t!("init_rt_path_prompt", locale = language).to_string(), "")?;
    let host = prompt_text(theme, t!("init_ls_host_prompt", locale = language).to_string(), "")?;
    let port = prompt_text(theme, t!("init_ls_port_prompt", locale = language).to_string(), "")?;

    Ok(GlobalConfig {
        cli_path,
        rt_path,
        license_server: LicenseServerConfig { host, port },
        database: DatabaseConfig::default(),
    })
}

fn write_file(path: &Path, content: &str, language: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_parse_into_configs() {
        let job: JobConfig = toml::from_str(JOB_TEMPLATE).unwrap();
        assert_eq!(job.projects, "suite");
        assert!(!job.report_required);
        assert!(job.validate().is_ok());

        let global: GlobalConfig = toml::from_str(GLOBAL_TEMPLATE).unwrap();
        assert_eq!(global, GlobalConfig::default());
    }

    #[test]
    fn existing_files_are_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join(DEFAULT_JOB_CONFIG);
        fs::write(&job_path, "projects = \"mine\"\n").unwrap();

        write_templates(dir.path(), false, "en").unwrap();

        assert_eq!(fs::read_to_string(&job_path).unwrap(), "projects = \"mine\"\n");
        assert_eq!(
            fs::read_to_string(dir.path().join(DEFAULT_GLOBAL_CONFIG)).unwrap(),
            GLOBAL_TEMPLATE
        );
    }

    #[test]
    fn force_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let job_path = dir.path().join(DEFAULT_JOB_CONFIG);
        fs::write(&job_path, "projects = \"mine\"\n").unwrap();

        write_templates(dir.path(), true, "en").unwrap();

        assert_eq!(fs::read_to_string(&job_path).unwrap(), JOB_TEMPLATE);
    }
}
