//! Unit tests for test status extraction on realistic logs

use multivac::status::{
    raw_statuses, test_statuses, StatusCache, StatusEvent, StatusOptions, StatusStream, TestKey,
    TestStatus,
};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::helpers::{fixture_path, temp_fixture, write_log};

fn ev(test: &str, conf: Option<&str>, status: TestStatus) -> StatusEvent {
    StatusEvent::new(TestKey::new(test, conf), status)
}

#[test]
fn raw_timeline_of_fixture() {
    let events = raw_statuses(fixture_path("testrun_retry.log"), &StatusOptions::default()).unwrap();

    assert_eq!(
        events,
        [
            ev("box/tx.test.lua", Some("memtx"), TestStatus::Fail),
            ev("app-tap/iconv.test.lua", None, TestStatus::Pass),
            ev("sql/select.test.lua", Some("vinyl"), TestStatus::Fail),
            ev("replication/gh-1.test.lua", None, TestStatus::Hang),
            ev("box/tx.test.lua", Some("memtx"), TestStatus::Pass),
            ev("box/stuck.test.lua", None, TestStatus::Fail),
        ]
    );
}

#[test]
fn reconciled_statuses_of_fixture() {
    let events = test_statuses(fixture_path("testrun_retry.log"), &StatusOptions::default()).unwrap();

    assert_eq!(
        events,
        [
            ev("box/tx.test.lua", Some("memtx"), TestStatus::TransientFail),
            ev("app-tap/iconv.test.lua", None, TestStatus::Pass),
            ev("sql/select.test.lua", Some("vinyl"), TestStatus::Fail),
            ev("replication/gh-1.test.lua", None, TestStatus::Hang),
            ev("box/stuck.test.lua", None, TestStatus::Fail),
        ]
    );
}

#[test]
fn hang_suffix_is_configurable() {
    let options = StatusOptions {
        hang_test_suffix: ".test.py".to_string(),
        ..StatusOptions::default()
    };
    let events = raw_statuses(fixture_path("testrun_retry.log"), &options).unwrap();

    assert!(events.contains(&ev("replication/gh-1.test.py", None, TestStatus::Hang)));
}

#[test]
fn log_without_test_output_has_no_events() {
    let dir = TempDir::new().unwrap();
    let path = write_log(dir.path(), "build.log", "cmake ..\nmake -j\nBuild finished\n");

    assert!(test_statuses(&path, &StatusOptions::default()).unwrap().is_empty());
}

#[test]
fn missing_log_is_an_error() {
    let err = test_statuses("/nonexistent/1.log", &StatusOptions::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn cache_is_written_then_reused() {
    let (_dir, path) = temp_fixture("testrun_retry.log");
    let options = StatusOptions {
        use_cache: true,
        ..StatusOptions::default()
    };
    let cache = StatusCache::for_log(&path);

    let first = raw_statuses(&path, &options).unwrap();
    assert!(cache.path().is_file());

    let second = raw_statuses(&path, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rewritten_log_is_parsed_again() {
    let (_dir, path) = temp_fixture("testrun_retry.log");
    let options = StatusOptions {
        use_cache: true,
        ..StatusOptions::default()
    };
    assert_eq!(raw_statuses(&path, &options).unwrap().len(), 6);

    std::fs::write(&path, "[001] new/only.test.lua      [ pass ]\n").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    assert_eq!(
        raw_statuses(&path, &options).unwrap(),
        [ev("new/only.test.lua", None, TestStatus::Pass)]
    );
}

#[test]
fn unwritable_cache_still_returns_events() {
    let dir = TempDir::new().unwrap();
    let path = write_log(dir.path(), "1.log", "[001] box/a.test.lua      [ pass ]\n");
    std::fs::create_dir(StatusCache::for_log(&path).path()).unwrap();
    let options = StatusOptions {
        use_cache: true,
        ..StatusOptions::default()
    };

    assert_eq!(
        raw_statuses(&path, &options).unwrap(),
        [ev("box/a.test.lua", None, TestStatus::Pass)]
    );
}

#[test]
fn corrupt_cache_is_replaced() {
    let (_dir, path) = temp_fixture("testrun_retry.log");
    let cache = StatusCache::for_log(&path);
    std::fs::write(cache.path(), "[[\"half").unwrap();
    let options = StatusOptions {
        use_cache: true,
        ..StatusOptions::default()
    };

    let events = raw_statuses(&path, &options).unwrap();

    assert_eq!(events.len(), 6);
    assert_eq!(cache.load(), Some(events));
}

#[test]
fn stream_over_in_memory_lines() {
    let lines = [
        "[001] box/a.test.lua      [ fail ]",
        "[001] box/a.test.lua      [ pass ]",
        "[002] box/b.test.lua      ",
    ];
    let events: Vec<_> = StatusStream::new(lines.iter().map(|l| Ok(*l)), ".test.lua")
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        multivac::status::reconcile(events),
        [
            ev("box/a.test.lua", None, TestStatus::TransientFail),
            ev("box/b.test.lua", None, TestStatus::Fail),
        ]
    );
}
