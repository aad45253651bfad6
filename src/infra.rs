//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for iTest Runner,
//! including shell execution, the execution log, file system and network
//! operations, logging and i18n support.
//!
//! 此模块为 iTest Runner 提供基础设施服务，
//! 包括 shell 执行、执行日志、文件系统和网络操作、日志以及国际化支持。

pub mod command;
pub mod fs;
pub mod log;
pub mod logging;
pub mod net;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
