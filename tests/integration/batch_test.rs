//! Batch command tests

use predicates::prelude::*;

use crate::helpers::{fixture_path, multivac};

fn copy_fixtures(dir: &std::path::Path) {
    for name in ["testrun_retry.log", "unsafe_repo.log", "passing.log"] {
        std::fs::copy(fixture_path(name), dir.join(name)).unwrap();
    }
}

#[test]
fn batch_prints_one_report_per_log() {
    let (mut cmd, home) = multivac();
    copy_fixtures(home.path());
    cmd.args(["batch", "-j", "2"]).arg(home.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let reports: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    let categories: Vec<_> = reports
        .iter()
        .map(|r| r["classification"]["category"].as_str().unwrap().to_string())
        .collect();
    // Directory entries are processed in name order.
    assert_eq!(
        categories,
        ["unknown_failure", "testrun_test_failed", "git_unsafe_error"]
    );
    assert_eq!(reports[1]["failed_tests"].as_array().unwrap().len(), 3);
}

#[test]
fn batch_failure_stats() {
    let (mut cmd, home) = multivac();
    copy_fixtures(home.path());
    std::fs::copy(
        fixture_path("unsafe_repo.log"),
        home.path().join("unsafe_repo_2.log"),
    )
    .unwrap();
    cmd.args(["batch", "--failure-stats"]).arg(home.path());

    cmd.assert().success().stdout(
        "git_unsafe_error 2\ntestrun_test_failed 1\nunknown_failure 1\ntotal 4\n",
    );
}

#[test]
fn batch_watch_failure() {
    let (mut cmd, _home) = multivac();
    cmd.arg("batch")
        .arg(fixture_path("testrun_retry.log"))
        .arg(fixture_path("unsafe_repo.log"))
        .args(["--watch-failure", "git_unsafe_error"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("unsafe_repo.log\n\t2023-03-02T08:00:05.0000000Z fatal"))
        .stdout(predicate::str::contains("testrun_retry.log").not());
}

#[test]
fn batch_keeps_going_past_missing_files() {
    let (mut cmd, _home) = multivac();
    cmd.arg("batch")
        .arg("/nonexistent/1.log")
        .arg(fixture_path("passing.log"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("unknown_failure"))
        .stderr(predicate::str::contains("1 of 2 logs could not be processed"));
}
