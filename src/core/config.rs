//! # Configuration Module / 配置模块
//!
//! Two configuration files drive a run:
//!
//! - `ITestJob.toml` ([`JobConfig`]): what to export and execute for one job.
//! - `ITestGlobal.toml` ([`GlobalConfig`]): executable paths, license server and
//!   report database, shared by every job and changed only by an explicit save.
//!
//! An empty string always means "option not requested".
//!
//! 两个配置文件驱动一次运行：`ITestJob.toml`（[`JobConfig`]）描述作业导出和执行的内容；
//! `ITestGlobal.toml`（[`GlobalConfig`]）保存可执行文件路径、许可证服务器和报告数据库，
//! 由所有作业共享，且只能通过显式保存来修改。空字符串始终表示"未请求该选项"。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ConfigError, PipelineError};
use crate::core::paths;

/// Default file name of the job configuration.
pub const DEFAULT_JOB_CONFIG: &str = "ITestJob.toml";
/// Default file name of the global configuration.
pub const DEFAULT_GLOBAL_CONFIG: &str = "ITestGlobal.toml";
/// Environment variable that overrides the global configuration path.
pub const GLOBAL_CONFIG_ENV: &str = "ITEST_GLOBAL_CONFIG";

/// Default license server port used by connectivity checks.
pub const DEFAULT_LICENSE_PORT: u16 = 27000;

/// Per-job settings, read once per run.
///
/// 每个作业的设置，每次运行读取一次。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobConfig {
    /// Language for console messages (e.g., "en", "zh-CN").
    #[serde(default = "default_language")]
    pub language: String,
    /// iTest workspace, absolute, relative to the job workspace, or using `${WORKSPACE}`.
    pub workspace: String,
    /// Comma-separated projects to export.
    pub projects: String,
    /// Comma-separated test-case URIs.
    pub testcases: String,
    /// Testbed file.
    pub testbed: String,
    /// Comma-separated `key=value` parameters.
    pub params: String,
    /// Parameter file.
    pub param_file: String,
    /// Generate and publish HTML reports.
    pub report_required: bool,
    /// Tag stored with the results in the report database.
    pub db_custom_tag: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl JobConfig {
    /// Loads a job configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Checks the fields a run cannot do without.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if split_list(&self.projects).is_empty() {
            return Err(PipelineError::Configuration(
                "at least one project must be listed in 'projects'".to_string(),
            ));
        }
        let testcases = split_list(&self.testcases);
        if testcases.is_empty() {
            return Err(PipelineError::Configuration(
                "at least one test case must be listed in 'testcases'".to_string(),
            ));
        }
        for testcase in &testcases {
            paths::test_case_uri(testcase)?;
        }
        Ok(())
    }

    /// Project list for `--exportProject`, all whitespace removed.
    pub fn export_projects(&self) -> String {
        strip_whitespace(&self.projects)
    }

    /// Parameters in listed order, whitespace removed, empty entries dropped.
    pub fn param_entries(&self) -> Vec<String> {
        split_list(&self.params)
    }

    /// Test-case entries in listed order, whitespace removed, empty entries dropped.
    pub fn testcase_entries(&self) -> Vec<String> {
        split_list(&self.testcases)
    }
}

/// License server address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LicenseServerConfig {
    pub host: String,
    pub port: String,
}

impl LicenseServerConfig {
    /// `host` or `host:port`, as passed to `--licenseServer`.
    pub fn address(&self) -> String {
        if self.port.is_empty() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Report database connection. A non-empty `uri` takes precedence over the
/// discrete `host`, `name`, `db_type` and `port` fields.
///
/// 报告数据库连接。非空的 `uri` 优先于单独的 `host`、`name`、`db_type` 和 `port` 字段。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub db_type: String,
    pub username: String,
    pub password: String,
    pub uri: String,
    pub host: String,
    pub port: String,
}

/// Settings shared by every run on this machine.
///
/// 本机所有运行共享的设置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Path to `itestcli`; empty means `itestcli` on `PATH`.
    pub cli_path: String,
    /// Path to `itestrt`; empty means `itestrt` on `PATH`.
    pub rt_path: String,
    pub license_server: LicenseServerConfig,
    pub database: DatabaseConfig,
}

impl GlobalConfig {
    /// Loads the global configuration. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "global configuration not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Persists the configuration. This is the only way it changes.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The CLI executable, defaulting to `itestcli`.
    pub fn cli_executable(&self) -> &str {
        if self.cli_path.is_empty() { "itestcli" } else { &self.cli_path }
    }

    /// The runtime executable, defaulting to `itestrt`.
    pub fn rt_executable(&self) -> &str {
        if self.rt_path.is_empty() { "itestrt" } else { &self.rt_path }
    }

    /// Checks the fields every run needs.
    pub fn validate_for_run(&self) -> Result<(), PipelineError> {
        if self.license_server.host.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "a license server host must be configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Removes every whitespace character.
fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits a comma-separated list after removing all whitespace, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    strip_whitespace(value)
        .split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
