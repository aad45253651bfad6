//! # Execution Log Module / 执行日志模块
//!
//! The run's log sink: an append-only file that collects the output of every
//! command in the run and is read back in full for classification.
//!
//! 运行的日志接收端：一个只追加的文件，收集本次运行中每条命令的输出，并在分类时完整读回。

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::error::PipelineError;

/// Append-only captured text of a run.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    path: PathBuf,
}

impl ExecutionLog {
    /// A log at `path`. Nothing is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A log at `path` with any file left by an earlier run removed.
    pub fn fresh(path: impl Into<PathBuf>) -> io::Result<Self> {
        let log = Self::new(path);
        match fs::remove_file(&log.path) {
            Ok(()) => Ok(log),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(log),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `text`, creating the file (and its directory) when needed.
    pub fn append(&self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(text.as_bytes())?;
        if !text.is_empty() && !text.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        Ok(())
    }

    /// The whole log. Invalid UTF-8 is replaced rather than rejected.
    pub fn read(&self) -> Result<String, PipelineError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "execution log is not readable");
                Err(PipelineError::MissingLog {
                    path: self.path.clone(),
                })
            }
        }
    }
}
