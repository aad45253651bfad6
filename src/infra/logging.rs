//! # Logging Initialization / 日志初始化
//!
//! Diagnostic logging through `tracing`. Console progress for users is printed
//! separately; these events describe what happened underneath (spawn failures,
//! exit codes, interrupts, publishing decisions) and go to stderr.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the requested level.
//!
//! 通过 `tracing` 输出诊断日志。面向用户的控制台进度单独打印；这些事件描述底层发生的情况
//! （启动失败、退出码、中断、发布决策），输出到 stderr。设置了 `RUST_LOG` 时使用其过滤规则。

use std::io::stderr;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::layer, prelude::*};

static INIT: Once = Once::new();

/// Installs the global subscriber once; later calls do nothing.
pub fn init_logging(log_level: &str) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,itest_runner={log_level}")));

        let result = tracing_subscriber::registry()
            .with(env_filter)
            .with(layer().with_writer(stderr).with_target(false))
            .try_init();

        if let Err(e) = result {
            eprintln!("Failed to initialize logging: {e}");
        }
    });
}
