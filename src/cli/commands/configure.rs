//! # Configure Command Module / 配置命令模块
//!
//! Changes fields of `ITestGlobal.toml`. Saving here is the only way the
//! global configuration changes; a run never writes it.
//!
//! 修改 `ITestGlobal.toml` 中的字段。这里的保存是修改全局配置的唯一途径，运行过程从不写入它。

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;
use std::path::Path;

use crate::core::config::GlobalConfig;
use crate::infra::t;

/// Field overrides given on the command line, keyed by argument id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOverrides {
    values: Vec<(&'static str, String)>,
}

impl GlobalOverrides {
    /// Argument ids and value names of every overridable field.
    pub const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("cli-path", "PATH"),
        ("rt-path", "PATH"),
        ("ls-host", "HOST"),
        ("ls-port", "PORT"),
        ("db-name", "NAME"),
        ("db-type", "TYPE"),
        ("db-user", "USER"),
        ("db-password", "PASSWORD"),
        ("db-uri", "URI"),
        ("db-host", "HOST"),
        ("db-port", "PORT"),
    ];

    pub fn from_matches(matches: &ArgMatches) -> Self {
        let values = Self::FIELDS
            .iter()
            .filter_map(|&(id, _)| matches.get_one::<String>(id).map(|value| (id, value.clone())))
            .collect();
        Self { values }
    }

    /// Adds one override. Unknown ids are ignored by [`apply`](Self::apply).
    pub fn set(&mut self, id: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.push((id, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes the overrides into `global`. Values are trimmed; an empty value clears the field.
    pub fn apply(&self, global: &mut GlobalConfig) {
        for (id, value) in &self.values {
            let value = value.trim().to_string();
            let field = match *id {
                "cli-path" => &mut global.cli_path,
                "rt-path" => &mut global.rt_path,
                "ls-host" => &mut global.license_server.host,
                "ls-port" => &mut global.license_server.port,
                "db-name" => &mut global.database.name,
                "db-type" => &mut global.database.db_type,
                "db-user" => &mut global.database.username,
                "db-password" => &mut global.database.password,
                "db-uri" => &mut global.database.uri,
                "db-host" => &mut global.database.host,
                "db-port" => &mut global.database.port,
                _ => continue,
            };
            *field = value;
        }
    }
}

/// Loads the global configuration at `path`, applies `overrides` and saves it.
pub fn execute(path: &Path, overrides: &GlobalOverrides, locale: &str) -> Result<()> {
    let mut global = GlobalConfig::load(path)
        .with_context(|| t!("config_read_failed_path", locale = locale, path = path.display()).to_string())?;

    if overrides.is_empty() {
        println!("{}", t!("configure_nothing_to_change", locale = locale).yellow());
    }
    overrides.apply(&mut global);

    global
        .save(path)
        .with_context(|| t!("configure_save_failed", locale = locale, path = path.display()).to_string())?;
    println!(
        "{} {}",
        "✔".green(),
        t!("configure_saved", locale = locale, path = path.display()).bold()
    );
    Ok(())
}
