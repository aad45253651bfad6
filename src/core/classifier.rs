//! # Output Classification Module / 输出分类模块
//!
//! Scans captured tool output line by line against two marker sets:
//!
//! - tool errors: the export or execute tool itself failed;
//! - test failures: a test case finished with a failed execution status.
//!
//! Matching is plain substring containment. A single pass produces a tagged
//! [`Verdict`]; tool errors take precedence and stop the scan.
//!
//! 逐行扫描捕获的工具输出，匹配两组标记：工具错误（导出或执行工具本身失败）
//! 和测试失败（测试用例执行状态为失败）。匹配为简单的子串包含。
//! 单次扫描生成带标签的 [`Verdict`]；工具错误优先并终止扫描。

use serde::{Deserialize, Serialize};

/// Substrings printed by `itestcli` and `itestrt` when they fail.
pub const TOOL_ERROR_MARKERS: &[&str] = &[
    "Error",
    "cannot find the path",
    "valid directory",
    "No project to be exported",
    "Failed to generate report",
];

/// Substring printed by `itestrt` for a failed test case.
pub const TEST_FAILURE_MARKER: &str = "Execution status:  Fail";

/// The line that triggered a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based line number within the log.
    pub line_number: usize,
    pub line: String,
    pub marker: String,
}

/// Result of scanning one log.
///
/// 扫描一个日志的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    NoError,
    ToolError(Finding),
    TestFailure(Finding),
}

impl Verdict {
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Verdict::ToolError(_))
    }
}

/// Classifies `log`, returning at the first tool error. Otherwise reports the
/// first test failure, if any.
pub fn classify(log: &str) -> Verdict {
    let mut test_failure = None;

    for (index, line) in log.lines().enumerate() {
        if let Some(marker) = tool_error_marker(line) {
            return Verdict::ToolError(finding(index, line, marker));
        }
        if test_failure.is_none() && line.contains(TEST_FAILURE_MARKER) {
            test_failure = Some(finding(index, line, TEST_FAILURE_MARKER));
        }
    }

    match test_failure {
        Some(found) => Verdict::TestFailure(found),
        None => Verdict::NoError,
    }
}

/// First line carrying a tool-error marker.
pub fn first_tool_error(log: &str) -> Option<Finding> {
    log.lines().enumerate().find_map(|(index, line)| {
        tool_error_marker(line).map(|marker| finding(index, line, marker))
    })
}

/// First line carrying the test-failure marker.
pub fn first_test_failure(log: &str) -> Option<Finding> {
    log.lines()
        .enumerate()
        .find(|(_, line)| line.contains(TEST_FAILURE_MARKER))
        .map(|(index, line)| finding(index, line, TEST_FAILURE_MARKER))
}

fn tool_error_marker(line: &str) -> Option<&'static str> {
    TOOL_ERROR_MARKERS.iter().copied().find(|marker| line.contains(marker))
}

fn finding(index: usize, line: &str, marker: &str) -> Finding {
    Finding {
        line_number: index + 1,
        line: line.to_string(),
        marker: marker.to_string(),
    }
}
