use itest_runner::config::{GlobalConfig, JobConfig};
use itest_runner::core::error::{ConfigError, PipelineError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_job_config_loads_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ITestJob.toml");
    fs::write(
        &path,
        r#"
workspace = "${WORKSPACE}/itest"
projects = "suite"
testcases = "project://suite/a.xml, project://suite/b.xml"
report_required = true
"#,
    )
    .unwrap();

    let job = JobConfig::load(&path).unwrap();
    assert_eq!(job.language, "en");
    assert!(job.report_required);
    assert!(job.testbed.is_empty());
    assert_eq!(job.testcase_entries(), vec!["project://suite/a.xml", "project://suite/b.xml"]);
    assert!(job.validate().is_ok());
}

#[test]
fn test_invalid_toml_is_a_deserialization_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "projects = [unclosed").unwrap();

    assert!(matches!(JobConfig::load(&path), Err(ConfigError::Deserialization(_))));
}

#[test]
fn test_missing_job_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        JobConfig::load(&dir.path().join("absent.toml")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_validation_requires_projects_and_testcases() {
    let job = JobConfig {
        testcases: "project://suite/a.xml".to_string(),
        ..JobConfig::default()
    };
    assert!(matches!(job.validate(), Err(PipelineError::Configuration(_))));

    let job = JobConfig {
        projects: "suite".to_string(),
        testcases: " , ".to_string(),
        ..JobConfig::default()
    };
    assert!(matches!(job.validate(), Err(PipelineError::Configuration(_))));
}

#[test]
fn test_param_entries_strip_all_whitespace() {
    let job = JobConfig {
        params: "a = 1, b=two words ,,".to_string(),
        ..JobConfig::default()
    };
    assert_eq!(job.param_entries(), vec!["a=1", "b=twowords"]);
}

#[test]
fn test_missing_global_config_yields_defaults() {
    let dir = tempdir().unwrap();
    let global = GlobalConfig::load(&dir.path().join("ITestGlobal.toml")).unwrap();
    assert_eq!(global, GlobalConfig::default());
    assert_eq!(global.cli_executable(), "itestcli");
    assert_eq!(global.rt_executable(), "itestrt");
    assert!(global.validate_for_run().is_err());
}

/// Saving is the only way the global configuration changes; a save and a
/// reload give back the same values.
///
/// 保存是修改全局配置的唯一途径；保存后重新加载得到相同的值。
#[test]
fn test_global_config_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("ITestGlobal.toml");

    let mut global = GlobalConfig::default();
    global.rt_path = "/opt/itest/bin/itestrt".to_string();
    global.license_server.host = "licsrv".to_string();
    global.database.uri = "jdbc:postgresql://db:5432/results".to_string();
    global.save(&path).unwrap();

    let loaded = GlobalConfig::load(&path).unwrap();
    assert_eq!(loaded, global);
    assert!(loaded.validate_for_run().is_ok());
}
