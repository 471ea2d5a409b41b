//! Forward line reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::trim_cr;
use crate::error::{Result, SensorError};

/// One physical line of a log with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub number: usize,
    pub text: String,
}

impl AsRef<str> for LogLine {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Lazy iterator over the lines of a log, front to back.
///
/// Invalid UTF-8 is decoded lossily; the log is best-effort text.
pub struct LogLines<R = BufReader<File>> {
    reader: R,
    path: PathBuf,
    buf: Vec<u8>,
    number: usize,
    finished: bool,
}

impl LogLines<BufReader<File>> {
    /// Open `path` for a forward traversal.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SensorError::open(path, e))?;
        Ok(Self::from_reader(BufReader::new(file), path))
    }
}

impl<R: BufRead> LogLines<R> {
    /// Traverse any buffered reader; `label` is used in error messages.
    pub fn from_reader(reader: R, label: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: label.into(),
            buf: Vec::with_capacity(256),
            number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                trim_cr(&mut self.buf);
                self.number += 1;
                Some(Ok(LogLine {
                    number: self.number,
                    text: String::from_utf8_lossy(&self.buf).into_owned(),
                }))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(SensorError::read(&self.path, e)))
            }
        }
    }
}
