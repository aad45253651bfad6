//! Property-based tests for path resolution, command building and output
//! classification.
//!
//! 路径解析、命令构建和输出分类的基于属性的测试。

mod common;

use common::{global_config, job_config};
use itest_runner::classifier::{classify, Verdict};
use itest_runner::command::{CommandBuilder, ResolvedPaths};
use itest_runner::config::JobConfig;
use itest_runner::paths::PathResolver;
use proptest::prelude::*;

/// Fixed order of the optional execute options.
const EXECUTE_ORDER: &[&str] = &["--licenseServer", "--itar", "--testbed", "--param", "--paramfile", "--test"];

fn placeholder() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("${WORKSPACE}".to_string()),
        Just("${workspace}".to_string()),
        Just("${WorkSpace}".to_string()),
    ]
}

// =============================================================================
// Path Resolution Properties
// =============================================================================

proptest! {
    /// Property: `<anything>${WORKSPACE}<rest>` resolves to `<base><rest>`.
    #[test]
    fn placeholder_resolution_keeps_only_the_remainder(
        prefix in "[a-z/]{0,12}",
        marker in placeholder(),
        rest in "[A-Za-z0-9_./]{0,24}",
    ) {
        let resolver = PathResolver::new("/base/ws");
        let raw = format!("{}{}{}", prefix, marker, rest);
        prop_assert_eq!(resolver.resolve(&raw), format!("/base/ws{}", rest));
    }

    /// Property: absolute inputs come back unchanged.
    #[test]
    fn absolute_paths_are_unchanged(path in "(/|[A-Za-z]:\\\\)[a-z0-9_]{1,8}(/[a-z0-9_.]{1,8}){0,4}") {
        let resolver = PathResolver::new("/base/ws");
        prop_assert_eq!(resolver.resolve(&path), path);
    }

    /// Property: relative inputs are appended to the base after one separator.
    #[test]
    fn relative_paths_are_joined(path in "[a-z0-9_]{1,8}(/[a-z0-9_.]{1,8}){0,4}") {
        let resolver = PathResolver::new("/base/ws");
        prop_assert_eq!(resolver.resolve(&path), format!("/base/ws/{}", path));
    }
}

// =============================================================================
// Command Builder Properties
// =============================================================================

proptest! {
    /// Property: whatever subset of optional fields is set, empty fields emit
    /// no flag and the emitted flags keep the fixed order.
    #[test]
    fn execute_flags_are_order_stable(
        testbed in prop::option::of("[a-z]{1,8}\\.tbml"),
        params in prop::collection::vec("[a-z]{1,5}=[0-9]{1,3}", 0..4),
        param_file in prop::option::of("/[a-z]{1,8}/params\\.txt"),
        tests in prop::collection::vec("project://suite/[a-z]{1,8}\\.xml", 1..4),
    ) {
        let job = JobConfig {
            testbed: testbed.clone().unwrap_or_default(),
            params: params.join(","),
            param_file: param_file.clone().unwrap_or_default(),
            ..job_config(&tests.join(","))
        };
        let global = global_config();
        let paths = ResolvedPaths::resolve(&job, &PathResolver::new("/ws"));
        let (cmd, test_cases) = CommandBuilder::new(&global, &job, &paths).execute().unwrap();
        let flags = cmd.flags();

        let ranks: Vec<usize> = flags
            .iter()
            .map(|flag| EXECUTE_ORDER.iter().position(|known| known == flag).unwrap())
            .collect();
        prop_assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));

        prop_assert_eq!(flags.contains(&"--testbed"), testbed.is_some());
        prop_assert_eq!(flags.contains(&"--paramfile"), param_file.is_some());
        prop_assert_eq!(cmd.values_of("--param").len(), params.len());
        prop_assert_eq!(cmd.values_of("--test"), tests.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(test_cases.len(), tests.len());
        prop_assert!(cmd.options().iter().all(|option| !option.value.is_empty()));
    }
}

// =============================================================================
// Classification Properties
// =============================================================================

proptest! {
    /// Property: logs made only of passing status lines are clean.
    #[test]
    fn passing_logs_are_clean(count in 0usize..20) {
        let log = "Execution status:  Pass\n".repeat(count);
        prop_assert_eq!(classify(&log), Verdict::NoError);
    }

    /// Property: a failed status line anywhere in otherwise clean output is found
    /// at its own line number.
    #[test]
    fn failed_status_is_found(before in 0usize..10, after in 0usize..10) {
        let mut lines = vec!["Execution status:  Pass"; before];
        lines.push("Execution status:  Fail");
        lines.extend(vec!["Execution status:  Pass"; after]);

        match classify(&lines.join("\n")) {
            Verdict::TestFailure(finding) => prop_assert_eq!(finding.line_number, before + 1),
            other => prop_assert!(false, "expected a test failure, got {:?}", other),
        }
    }
}
