//! CLI behaviour tests

use predicates::prelude::*;

use crate::helpers::{fixture_path, multivac};

#[test]
fn status_prints_reconciled_events() {
    let (mut cmd, _home) = multivac();
    cmd.arg("status").arg(fixture_path("testrun_retry.log"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "event: test status; test: box/tx.test.lua; conf: memtx; status: transient fail\n",
        ))
        .stdout(predicate::str::contains(
            "event: test status; test: replication/gh-1.test.lua; conf: none; status: hang\n",
        ));
}

#[test]
fn status_raw_keeps_retries() {
    let (mut cmd, _home) = multivac();
    cmd.args(["status", "--raw"]).arg(fixture_path("testrun_retry.log"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(text.lines().count(), 6);
    assert_eq!(text.matches("test: box/tx.test.lua;").count(), 2);
}

#[test]
fn status_json_lines() {
    let (mut cmd, _home) = multivac();
    cmd.args(["status", "--json"]).arg(fixture_path("testrun_retry.log"));

    cmd.assert().success().stdout(predicate::str::contains(
        r#"{"test":"app-tap/iconv.test.lua","configuration":null,"status":"pass"}"#,
    ));
}

#[test]
fn status_of_missing_log_fails() {
    let (mut cmd, _home) = multivac();
    cmd.args(["status", "/nonexistent/42.log"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read test statuses"))
        .stderr(predicate::str::contains("/nonexistent/42.log"));
}

#[test]
fn status_cache_flag_writes_side_file() {
    let (mut cmd, home) = multivac();
    let log = home.path().join("7.log");
    std::fs::copy(fixture_path("testrun_retry.log"), &log).unwrap();

    cmd.args(["status", "--cache"]).arg(&log).assert().success();

    assert!(home.path().join("7.log.test_status.cache.json").is_file());
}

#[test]
fn classify_prints_category_and_line() {
    let (mut cmd, _home) = multivac();
    cmd.arg("classify").arg(fixture_path("unsafe_repo.log"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("category: git_unsafe_error\n"))
        .stdout(predicate::str::contains("line: 2023-03-02T08:00:05.0000000Z fatal: unsafe repository"));
}

#[test]
fn classify_with_custom_catalogue_as_json() {
    let (mut cmd, _home) = multivac();
    cmd.arg("classify")
        .arg(fixture_path("unsafe_repo.log"))
        .arg("--catalogue")
        .arg(fixture_path("catalogue.toml"))
        .arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""category":"process_exit""#));
}

#[test]
fn classify_unknown_failure() {
    let (mut cmd, _home) = multivac();
    cmd.arg("classify").arg(fixture_path("passing.log"));

    cmd.assert().success().stdout("category: unknown_failure\n");
}

#[test]
fn invalid_catalogue_is_reported() {
    let (mut cmd, home) = multivac();
    let catalogue = home.path().join("bad.toml");
    std::fs::write(
        &catalogue,
        "[[category]]\ntag = \"broken\"\ngroup = \"specific\"\npatterns = ['(oops']\n",
    )
    .unwrap();

    cmd.arg("classify")
        .arg(fixture_path("passing.log"))
        .arg("--catalogue")
        .arg(&catalogue);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Category 'broken' has an invalid pattern"));
}

#[test]
fn catalogue_renders_markdown() {
    let (mut cmd, _home) = multivac();
    cmd.arg("catalogue");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("# Failure categories\n"))
        .stdout(predicate::str::contains("### `checkpatch`"));
}

#[test]
fn config_show_prints_defaults() {
    let (mut cmd, _home) = multivac();
    cmd.args(["config", "show"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[reader]\nchunk_size = 8192\n"))
        .stdout(predicate::str::contains("hang_test_suffix = \".test.lua\""));
}

#[test]
fn config_init_writes_file() {
    let (mut cmd, home) = multivac();
    cmd.args(["config", "init"]).assert().success();

    let written = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(written.contains("[status]"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let (mut cmd, _home) = multivac();
    cmd.env("MULTIVAC_LOG", "debug")
        .arg("classify")
        .arg(fixture_path("unsafe_repo.log"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Classified log").not())
        .stderr(predicate::str::contains("Classified log"));
}
