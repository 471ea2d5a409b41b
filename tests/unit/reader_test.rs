//! Unit tests for forward and backward log traversal

use multivac::reader::{LogLines, ReverseLines};
use tempfile::TempDir;

use crate::helpers::{fixture_path, write_log};

fn forward(path: &std::path::Path) -> Vec<String> {
    LogLines::open(path)
        .unwrap()
        .map(|line| line.unwrap().text)
        .collect()
}

fn backward(path: &std::path::Path, chunk_size: usize) -> Vec<String> {
    ReverseLines::open_with_chunk_size(path, chunk_size)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn assert_mirror(path: &std::path::Path, chunk_size: usize) {
    let mut reversed = backward(path, chunk_size);
    reversed.reverse();
    assert_eq!(reversed, forward(path), "chunk size {}", chunk_size);
}

#[test]
fn backward_mirrors_forward_for_any_chunk_size() {
    let dir = TempDir::new().unwrap();
    let content = "first\n\nthird line is longer\nx\n\n\nlast";
    let path = write_log(dir.path(), "a.log", content);

    // Smaller than a line, equal to the file, and larger than the file.
    for chunk_size in [1, 2, 3, 7, 16, content.len(), content.len() + 1, 8192] {
        assert_mirror(&path, chunk_size);
    }
}

#[test]
fn backward_mirrors_forward_on_fixture() {
    let path = fixture_path("testrun_retry.log");
    for chunk_size in [5, 64, 100, 4096] {
        assert_mirror(&path, chunk_size);
    }
}

#[test]
fn file_spanning_many_chunks() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..500).map(|i| format!("line {}\n", i)).collect();
    let path = write_log(dir.path(), "big.log", &content);

    let lines = backward(&path, 64);

    assert_eq!(lines.len(), 500);
    assert_eq!(lines[0], "line 499");
    assert_eq!(lines[499], "line 0");
}

#[test]
fn empty_file_yields_nothing_both_ways() {
    let dir = TempDir::new().unwrap();
    let path = write_log(dir.path(), "empty.log", "");

    assert!(forward(&path).is_empty());
    assert!(backward(&path, 8).is_empty());
}

#[test]
fn crlf_logs_read_like_lf_logs() {
    let dir = TempDir::new().unwrap();
    let path = write_log(dir.path(), "crlf.log", "a\r\nb\r\n");

    assert_eq!(forward(&path), ["a", "b"]);
    assert_eq!(backward(&path, 3), ["b", "a"]);
}

#[test]
fn missing_file_is_an_open_error() {
    assert!(ReverseLines::open("/nonexistent/job.log")
        .err()
        .unwrap()
        .is_not_found());
    assert!(LogLines::open("/nonexistent/job.log").err().unwrap().is_not_found());
}

#[test]
fn forward_lines_are_numbered() {
    let path = fixture_path("unsafe_repo.log");
    let numbers: Vec<usize> = LogLines::open(&path)
        .unwrap()
        .map(|line| line.unwrap().number)
        .collect();
    assert_eq!(numbers, [1, 2, 3, 4, 5]);
}
