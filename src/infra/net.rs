//! # Connectivity Checks / 连通性检查
//!
//! Checks behind the `check` command: executable paths, license server and
//! report database reachability. They are never part of a pipeline run.
//!
//! `check` 命令背后的检查：可执行文件路径、许可证服务器和报告数据库的可达性。
//! 它们从不属于流水线运行的一部分。

use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use url::Url;

use crate::core::config::{DatabaseConfig, DEFAULT_LICENSE_PORT, GlobalConfig};

/// Connect timeout of every reachability probe.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Why a connectivity check failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("CLI path must point to the itestcli executable")]
    CliPath,
    #[error("RT path must point to the itestrt executable")]
    RtPath,
    #[error("must specify license server")]
    MissingLicenseServer,
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("missing required database field")]
    MissingDatabaseField,
    #[error("please specify database username and password")]
    MissingCredentials,
    #[error("unsupported database type '{0}'")]
    UnsupportedDatabase(String),
    #[error("invalid database URI '{0}'")]
    InvalidUri(String),
    #[error("cannot reach {0}")]
    Unreachable(String),
}

/// Database products the report database can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    MySql,
    PostgreSql,
}

impl DatabaseKind {
    /// Parses a configured type name, case-insensitively.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" => Some(DatabaseKind::MySql),
            "postgresql" => Some(DatabaseKind::PostgreSql),
            _ => None,
        }
    }

    /// Infers the type from a connection URI: MySQL if it says so, PostgreSQL otherwise.
    pub fn from_uri(uri: &str) -> Self {
        if uri.to_ascii_lowercase().contains("mysql") {
            DatabaseKind::MySql
        } else {
            DatabaseKind::PostgreSql
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::PostgreSql => "postgresql",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            DatabaseKind::MySql => 3306,
            DatabaseKind::PostgreSql => 5432,
        }
    }
}

/// Non-empty executable paths must name `itestcli` / `itestrt`.
pub fn check_executable_paths(global: &GlobalConfig) -> Result<(), CheckError> {
    if !global.cli_path.is_empty() && !global.cli_path.contains("itestcli") {
        return Err(CheckError::CliPath);
    }
    if !global.rt_path.is_empty() && !global.rt_path.contains("itestrt") {
        return Err(CheckError::RtPath);
    }
    Ok(())
}

/// Host and port a license server check connects to.
pub fn license_server_target(global: &GlobalConfig) -> Result<(String, u16), CheckError> {
    let server = &global.license_server;
    if server.host.trim().is_empty() {
        return Err(CheckError::MissingLicenseServer);
    }
    let port = parse_port(&server.port, DEFAULT_LICENSE_PORT)?;
    Ok((server.host.trim().to_string(), port))
}

/// Connection URL of the report database: the configured URI, or
/// `jdbc:<type>://<host>:<port>/<name>` built from the discrete fields.
pub fn database_url(db: &DatabaseConfig) -> Result<String, CheckError> {
    let url = if db.uri.is_empty() {
        let required = [&db.name, &db.db_type, &db.host, &db.port, &db.username, &db.password];
        if required.iter().any(|field| field.is_empty()) {
            return Err(CheckError::MissingDatabaseField);
        }
        let kind = DatabaseKind::from_type_name(&db.db_type)
            .ok_or_else(|| CheckError::UnsupportedDatabase(db.db_type.clone()))?;
        format!("jdbc:{}://{}:{}/{}", kind.scheme(), db.host, db.port, db.name)
    } else {
        db.uri.clone()
    };

    if db.username.is_empty() || db.password.is_empty() {
        return Err(CheckError::MissingCredentials);
    }
    Ok(url)
}

/// Host and port of a database connection URL (`jdbc:` prefix optional).
pub fn database_target(url: &str) -> Result<(String, u16), CheckError> {
    let kind = DatabaseKind::from_uri(url);
    let stripped = url.strip_prefix("jdbc:").unwrap_or(url);
    let parsed = Url::parse(stripped).map_err(|_| CheckError::InvalidUri(url.to_string()))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| CheckError::InvalidUri(url.to_string()))?;
    Ok((host.to_string(), parsed.port().unwrap_or(kind.default_port())))
}

/// Opens and closes a TCP connection within [`CONNECT_TIMEOUT`].
pub async fn probe(host: &str, port: u16) -> Result<(), CheckError> {
    let address = format!("{}:{}", host, port);
    match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(address.as_str())).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => {
            tracing::debug!(%address, error = %e, "connection refused");
            Err(CheckError::Unreachable(address))
        }
        Err(_) => {
            tracing::debug!(%address, "connection timed out");
            Err(CheckError::Unreachable(address))
        }
    }
}

/// Validates the license server settings and connects to it.
pub async fn check_license_server(global: &GlobalConfig) -> Result<(), CheckError> {
    let (host, port) = license_server_target(global)?;
    probe(&host, port).await
}

/// Validates the database settings and connects to the database host.
pub async fn check_database(db: &DatabaseConfig) -> Result<(), CheckError> {
    let url = database_url(db)?;
    let (host, port) = database_target(&url)?;
    probe(&host, port).await
}

fn parse_port(value: &str, default: u16) -> Result<u16, CheckError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| CheckError::InvalidPort(value.to_string()))
}
