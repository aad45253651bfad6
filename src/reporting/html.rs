//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders the index wrapper page that sits next to each archived report and
//! links to its files.
//!
//! 渲染位于每个归档报告旁边并链接其文件的索引包装页。

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::core::models::ReportDescriptor;
use crate::infra::t;

/// File name of the index wrapper written for every archived report.
pub const WRAPPER_NAME: &str = "htmlpublisher-wrapper.html";

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Renders the wrapper page for one report.
///
/// # Arguments / 参数
/// * `report` - The report being archived / 正在归档的报告
/// * `files` - Names of the files that were archived / 已归档文件的名称
/// * `run_id` - The run that produced the report / 生成报告的运行
/// * `locale` - The locale to use for internationalization / 用于国际化的语言环境
pub fn render_wrapper(report: &ReportDescriptor, files: &[String], run_id: &str, locale: &str) -> String {
    let page: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (report.name) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (report.name) }
                p class="run-id" { (t!("html_report.run", locale = locale, id = run_id)) }
                @if files.is_empty() {
                    p class="missing" { (t!("html_report.no_files", locale = locale)) }
                } @else {
                    ul class="report-files" {
                        @for file in files {
                            li { a href=(file) { (file) } }
                        }
                    }
                    @if let Some(first) = files.first() {
                        iframe class="report-frame" src=(first) {}
                    }
                }
            }
        }
    };
    page.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn wrapper_links_every_file_and_escapes_names() {
        let report = ReportDescriptor::for_test_case("project://suite/a<b>.xml", PathBuf::from("/r"));
        let page = render_wrapper(&report, &["a<b>.html".to_string()], "42", "en");

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("href=\"a&lt;b&gt;.html\""));
        assert!(page.contains("Spirent iTest Report-a&lt;b&gt;"));
    }
}
