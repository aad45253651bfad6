//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file system operations of a run: creating the
//! per-run report directory and archiving published report files.
//!
//! 此模块提供运行所需的文件系统操作：创建每次运行的报告目录以及归档发布的报告文件。

use anyhow::{Context, Result};
use fs_extra::file::{copy, CopyOptions};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::REPORT_DIR_PREFIX;

/// Path of the report directory of `run_id` inside `workspace`.
pub fn report_dir(workspace: &Path, run_id: &str) -> PathBuf {
    workspace.join(format!("{}{}", REPORT_DIR_PREFIX, run_id))
}

/// Creates the report directory for a run. An existing directory is fine.
///
/// # Arguments
/// * `workspace` - Root of the job workspace
/// * `run_id` - Identifier of the run, used in the directory name
///
/// # Returns
/// The path of the directory
pub fn create_report_dir(workspace: &Path, run_id: &str) -> Result<PathBuf> {
    let dir = report_dir(workspace, run_id);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    Ok(dir)
}

/// Copies one file into `to_dir`, overwriting an older copy.
pub fn copy_into(file: &Path, to_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(to_dir)
        .with_context(|| format!("Failed to create directory: {}", to_dir.display()))?;
    let file_name = file
        .file_name()
        .with_context(|| format!("Not a file: {}", file.display()))?;
    let target = to_dir.join(file_name);

    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy(file, &target, &options)
        .with_context(|| format!("Failed to copy {} to {}", file.display(), target.display()))?;
    Ok(target)
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
