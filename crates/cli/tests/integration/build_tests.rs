use predicates::prelude::*;

use super::common::TestEnv;

const MATRIX: &str = r#"{
  "global": {"OPT": "1"},
  "target": {"t1": {"X": "a"}, "t2": {"X": "b"}},
  "alias_target": {"t1": ["t1alias"]}
}"#;

const SECOND_FAILS: &str = r#"{
  "target": {"t1": {}, "t2": {"BUILD_FAIL": "1"}, "t3": {}}
}"#;

#[test]
fn builds_and_installs_every_target_with_aliases() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Build Target"))
    .stdout(predicate::str::contains("status: true"));

  let install = env.install_path();
  assert!(install.join("libnmsis_dsp_t1.a").is_file());
  assert!(install.join("libnmsis_dsp_t1alias.a").is_file());
  assert!(install.join("libnmsis_dsp_t2.a").is_file());
  assert!(env.build_path().join("nmsis_dsp").join("t2").join("build.log").is_file());
}

#[test]
fn global_options_reach_the_configure_tool() {
  let env = TestEnv::with_config(MATRIX);

  env.nlbuild_cmd().args(["--target", "t2"]).assert().success();

  let calls = env.calls("cmake");
  assert_eq!(calls.len(), 1);
  assert!(calls[0].starts_with("-DOPT=1 -DX=b -S "));
}

#[test]
fn lib_prefix_names_the_installed_libraries() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .args(["--lib_prefix", "nmsis_nn", "--target", "t1"])
    .assert()
    .success();

  assert!(env.install_path().join("libnmsis_nn_t1.a").is_file());
  assert!(env.install_path().join("libnmsis_nn_t1alias.a").is_file());
}

#[test]
fn parallel_flag_is_passed_to_make() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .args(["--target", "t1", "--parallel", "-j8"])
    .assert()
    .success();

  assert!(env.calls("make")[0].starts_with("-j8 -C "));
}

#[test]
fn first_failure_stops_the_run() {
  let env = TestEnv::with_config(SECOND_FAILS);

  env
    .nlbuild_cmd()
    .assert()
    .code(1)
    .stdout(predicate::str::contains("status: false"))
    .stdout(predicate::str::contains("| t3 ").not());

  assert_eq!(env.calls("make").len(), 2);
  assert!(!env.install_path().join("libnmsis_dsp_t3.a").exists());
}

#[test]
fn ignore_fail_builds_remaining_targets() {
  let env = TestEnv::with_config(SECOND_FAILS);

  env
    .nlbuild_cmd()
    .arg("--ignore_fail")
    .assert()
    .code(1)
    .stdout(predicate::str::contains("| t3 "));

  assert_eq!(env.calls("make").len(), 3);
  assert!(env.install_path().join("libnmsis_dsp_t3.a").is_file());
}

#[test]
fn norebuild_reuses_configuration_and_warns() {
  let env = TestEnv::with_config(MATRIX);
  env.nlbuild_cmd().args(["--target", "t1"]).assert().success();

  env
    .nlbuild_cmd()
    .args(["--target", "t1", "--norebuild"])
    .assert()
    .success()
    .stdout(predicate::str::contains("CAUTION"));

  assert_eq!(env.calls("cmake").len(), 1);
  assert_eq!(env.calls("make").len(), 2);
}

#[test]
fn strip_runs_once_over_installed_libraries() {
  let env = TestEnv::with_config(MATRIX);

  env.nlbuild_cmd().arg("--strip").assert().success();

  let calls = env.calls("strip");
  assert_eq!(calls.len(), 1);
  assert!(calls[0].starts_with("-g "));
  assert_eq!(calls[0].matches("libnmsis_dsp_").count(), 3);
}

#[test]
fn cli_tool_flags_override_environment() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .args(["--target", "t1", "--make", "/nonexistent/make"])
    .assert()
    .code(1);

  assert!(env.calls("make").is_empty());
}

#[test]
fn json_format_prints_report() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .args(["--format", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"target\": \"t1\""))
    .stdout(predicate::str::contains("\"success\": true"));
}

#[test]
fn json_format_keeps_stdout_parseable() {
  let env = TestEnv::with_config(MATRIX);

  let output = env.nlbuild_cmd().args(["--format", "json"]).output().unwrap();

  assert!(output.status.success());
  let stdout = String::from_utf8(output.stdout).unwrap();
  let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(summary["success"], true);
  assert_eq!(summary["results"].as_array().unwrap().len(), 2);
  assert_eq!(summary["results"][0]["installed"].as_array().unwrap().len(), 2);
  assert!(String::from_utf8_lossy(&output.stderr).contains("Built target lib"));
}

#[test]
fn archive_failure_is_reported_as_warning() {
  let env = TestEnv::with_config(MATRIX);

  env
    .nlbuild_cmd()
    .args(["--target", "t2", "--ar", "/nonexistent/ar"])
    .assert()
    .success()
    .stdout(predicate::str::contains("true (2 warnings)"))
    .stdout(predicate::str::contains("Warnings: 2"))
    .stdout(predicate::str::contains("t2: failed to archive libnmsis_dsp_t2.a"));
}

#[test]
fn archive_failure_appears_in_json_report() {
  let env = TestEnv::with_config(MATRIX);

  let output = env
    .nlbuild_cmd()
    .args(["--target", "t2", "--ar", "/nonexistent/ar", "--format", "json"])
    .output()
    .unwrap();

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let warnings = summary["results"][0]["warnings"].as_array().unwrap();
  assert_eq!(warnings.len(), 2);
  assert!(warnings[0].as_str().unwrap().contains("failed to archive"));
}
