//! # Reporting Module / 报告模块
//!
//! This module handles what a run leaves for people to look at: the colorful
//! stage summary on the console, the JSON run summary, and publishing of the
//! HTML reports written by `itestrt` together with their index pages.
//!
//! 此模块处理运行结束后供人查看的内容：控制台上的彩色阶段摘要、JSON 运行摘要，
//! 以及发布 `itestrt` 生成的 HTML 报告及其索引页。

pub mod console;
pub mod html;
pub mod publisher;
pub mod summary;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::render_wrapper;
pub use publisher::{ArchivePublisher, ReportPublisher};
pub use summary::write_json_summary;
