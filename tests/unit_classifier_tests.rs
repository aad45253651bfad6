use itest_runner::classifier::{
    classify, first_test_failure, first_tool_error, Verdict, TEST_FAILURE_MARKER, TOOL_ERROR_MARKERS,
};

#[test]
fn test_path_not_found_is_a_tool_error() {
    let verdict = classify("Error: cannot find the path specified");
    match verdict {
        Verdict::ToolError(finding) => {
            assert_eq!(finding.line_number, 1);
            assert_eq!(finding.marker, "Error");
        }
        other => panic!("expected a tool error, got {:?}", other),
    }
}

#[test]
fn test_passing_log_is_clean() {
    assert_eq!(classify("Execution status:  Pass"), Verdict::NoError);
    assert_eq!(classify(""), Verdict::NoError);
    assert!(first_tool_error("Execution status:  Pass\nExecution status:  Pass").is_none());
}

#[test]
fn test_failed_status_is_a_test_failure() {
    let log = "case1\nExecution status:  Pass\ncase2\nExecution status:  Fail\nExecution status:  Fail\n";
    match classify(log) {
        Verdict::TestFailure(finding) => {
            assert_eq!(finding.line_number, 4);
            assert_eq!(finding.marker, TEST_FAILURE_MARKER);
        }
        other => panic!("expected a test failure, got {:?}", other),
    }
    assert!(first_test_failure("Execution status:  Pass\n").is_none());
}

/// The marker has two spaces; a single space does not count.
///
/// 标记中有两个空格；单个空格不算。
#[test]
fn test_failure_marker_is_exact() {
    assert_eq!(classify("Execution status: Fail"), Verdict::NoError);
}

#[test]
fn test_every_tool_marker_is_detected() {
    for marker in TOOL_ERROR_MARKERS {
        let log = format!("starting\nsomething {} happened\n", marker);
        let finding = first_tool_error(&log).unwrap_or_else(|| panic!("marker not detected: {}", marker));
        assert_eq!(finding.line_number, 2);
        assert!(classify(&log).is_tool_error());
    }
}

#[test]
fn test_tool_error_takes_precedence_over_earlier_test_failure() {
    let log = "Execution status:  Fail\nFailed to generate report\n";
    match classify(log) {
        Verdict::ToolError(finding) => assert_eq!(finding.marker, "Failed to generate report"),
        other => panic!("expected a tool error, got {:?}", other),
    }
}

#[test]
fn test_matching_is_case_sensitive() {
    assert_eq!(classify("error: lowercase is not a marker"), Verdict::NoError);
}
