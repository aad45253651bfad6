use itest_runner::core::error::PipelineError;
use itest_runner::paths::{expand_env_with, is_absolute, test_case_uri, PathResolver};

#[test]
fn test_placeholder_replaces_everything_before_it() {
    let resolver = PathResolver::new("/var/lib/jenkins/workspace/job");

    assert_eq!(resolver.resolve("${WORKSPACE}/suite"), "/var/lib/jenkins/workspace/job/suite");
    assert_eq!(
        resolver.resolve("ignored/prefix/${workspace}/Suite/Case"),
        "/var/lib/jenkins/workspace/job/Suite/Case"
    );
    assert_eq!(resolver.resolve("${WORKSPACE}"), "/var/lib/jenkins/workspace/job");
}

#[test]
fn test_placeholder_remainder_is_not_normalized() {
    let resolver = PathResolver::new("/ws/");
    assert_eq!(resolver.resolve("${WORKSPACE}//a"), "/ws///a");
}

#[test]
fn test_absolute_paths_are_unchanged() {
    let resolver = PathResolver::new("/ws");

    assert_eq!(resolver.resolve("/opt/itest/testbed.tbml"), "/opt/itest/testbed.tbml");
    assert_eq!(resolver.resolve("C:\\itest\\testbed.tbml"), "C:\\itest\\testbed.tbml");
    assert_eq!(resolver.resolve("d:/itest/params.txt"), "d:/itest/params.txt");
    assert_eq!(resolver.resolve("\\\\share\\itest"), "\\\\share\\itest");
}

#[test]
fn test_absolute_pattern() {
    assert!(is_absolute("/a"));
    assert!(is_absolute("\\a"));
    assert!(is_absolute("C:\\a"));
    assert!(is_absolute("z:/a"));
    assert!(!is_absolute("C:a"));
    assert!(!is_absolute("relative/a"));
    assert!(!is_absolute(""));
}

#[test]
fn test_empty_path_is_the_workspace() {
    let resolver = PathResolver::new("/ws/job");
    assert_eq!(resolver.resolve(""), "/ws/job");
}

#[test]
fn test_relative_paths_join_with_one_separator() {
    assert_eq!(PathResolver::new("/ws/job").resolve("itest/suite"), "/ws/job/itest/suite");
    assert_eq!(PathResolver::new("/ws/job/").resolve("itest"), "/ws/job/itest");
    assert_eq!(PathResolver::new("C:\\ws\\job").resolve("itest"), "C:\\ws\\job\\itest");
}

#[test]
fn test_env_expansion_leaves_unknown_names() {
    let lookup = |name: &str| match name {
        "ITEST_HOME" => Some("/opt/itest".to_string()),
        _ => None,
    };

    assert_eq!(expand_env_with("$ITEST_HOME/bin", lookup), "/opt/itest/bin");
    assert_eq!(expand_env_with("${ITEST_HOME}/bin", lookup), "/opt/itest/bin");
    assert_eq!(expand_env_with("$UNKNOWN_NAME/bin", lookup), "$UNKNOWN_NAME/bin");
    assert_eq!(expand_env_with("no references", lookup), "no references");
}

#[test]
fn test_expanded_absolute_path_stays_absolute() {
    let resolver = PathResolver::new("/jenkins/job");
    let lookup = |name: &str| match name {
        "ITEST_HOME" => Some("/opt/itest".to_string()),
        "ITEST_DRIVE" => Some("D:\\itest".to_string()),
        "SUITE_DIR" => Some("suites/nightly".to_string()),
        _ => None,
    };

    assert_eq!(resolver.resolve_expanded_with("$ITEST_HOME/ws", lookup), "/opt/itest/ws");
    assert_eq!(resolver.resolve_expanded_with("${ITEST_HOME}/tb.tbml", lookup), "/opt/itest/tb.tbml");
    assert_eq!(resolver.resolve_expanded_with("$ITEST_DRIVE\\ws", lookup), "D:\\itest\\ws");
    assert_eq!(resolver.resolve_expanded_with("$SUITE_DIR/ws", lookup), "/jenkins/job/suites/nightly/ws");
}

#[test]
fn test_expanded_placeholder_still_maps_to_workspace() {
    let resolver = PathResolver::new("/jenkins/job");
    let lookup = |name: &str| match name {
        "WORKSPACE" => Some("/somewhere/else".to_string()),
        "SUITE" => Some("nightly".to_string()),
        _ => None,
    };

    assert_eq!(resolver.resolve_expanded_with("$WORKSPACE/ws", lookup), "/jenkins/job/ws");
    assert_eq!(resolver.resolve_expanded_with("${WORKSPACE}/$SUITE", lookup), "/jenkins/job/nightly");
    assert_eq!(resolver.resolve_expanded_with("$UNKNOWN_NAME/ws", lookup), "/jenkins/job/$UNKNOWN_NAME/ws");
}

#[test]
fn test_resolve_expanded_reads_process_environment() {
    // SAFETY: no other test in this binary reads or writes this variable.
    unsafe { std::env::set_var("ITEST_RUNNER_TEST_HOME", "/opt/itest") };
    let resolver = PathResolver::new("/jenkins/job");

    assert_eq!(resolver.resolve_expanded("$ITEST_RUNNER_TEST_HOME/ws"), "/opt/itest/ws");
}

#[test]
fn test_test_case_uri_forms() {
    assert_eq!(test_case_uri("project://suite/case1.xml").unwrap(), "project://suite/case1.xml");
    assert_eq!(test_case_uri("${WORKSPACE}/suite/case1.xml").unwrap(), "project://suite/case1.xml");
    assert_eq!(test_case_uri("%WORKSPACE%\\suite\\case1.xml").unwrap(), "project://suite\\case1.xml");
    assert_eq!(test_case_uri("${workspace}suite/case1.xml").unwrap(), "project://suite/case1.xml");
}

#[test]
fn test_test_case_uri_rejects_misplaced_placeholder() {
    assert!(matches!(
        test_case_uri("suite/${WORKSPACE}/case1.xml"),
        Err(PipelineError::Configuration(_))
    ));
    assert!(matches!(test_case_uri("${WORKSPACE}/"), Err(PipelineError::Configuration(_))));
}
