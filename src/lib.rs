//! # iTest Runner Library / iTest Runner 库
//!
//! This library drives the iTest toolchain from a CI build step: it exports
//! projects with `itestcli`, runs test cases with `itestrt`, scans the captured
//! output for failure markers and publishes the generated HTML reports.
//!
//! 此库在 CI 构建步骤中驱动 iTest 工具链：使用 `itestcli` 导出项目，
//! 使用 `itestrt` 运行测试用例，扫描捕获的输出中的失败标记并发布生成的 HTML 报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, path resolution, command building, output classification and the pipeline
//! - `infra` - Shell execution, the execution log, file system and network helpers, logging
//! - `reporting` - Console summary, HTML index pages and report publishing
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、路径解析、命令构建、输出分类和流水线
//! - `infra` - Shell 执行、执行日志、文件系统与网络辅助、日志
//! - `reporting` - 控制台摘要、HTML 索引页和报告发布
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::classifier;
pub use crate::core::command;
pub use crate::core::config;
pub use crate::core::paths;
pub use crate::core::pipeline;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
///
/// Returns the locale that was selected.
pub fn init() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let selected = select_locale(&locale);
    rust_i18n::set_locale(&selected);
    selected
}

/// Maps a requested locale onto one of the bundled translations.
pub fn select_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
