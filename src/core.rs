//! # Core Module / 核心模块
//!
//! This module contains the core functionality of iTest Runner: configuration,
//! path resolution, command construction, output classification and the
//! pipeline that sequences them.
//!
//! 此模块包含 iTest Runner 的核心功能：配置、路径解析、命令构建、
//! 输出分类以及将它们串联起来的流水线。

pub mod classifier;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod pipeline;

// Re-exports
pub use classifier::Verdict;
pub use config::{GlobalConfig, JobConfig};
pub use error::PipelineError;
pub use pipeline::Orchestrator;
