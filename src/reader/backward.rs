//! Backward line reader.
//!
//! Failure signals are almost always at the tail of a job log, so the
//! classifier reads logs from the end in fixed-size chunks instead of
//! loading them whole.
//!
//! # Algorithm
//!
//! ```text
//!  file:   | ... chunk k-1 ... | ....... chunk k ....... |
//!                              ^ head (carry)    ^ complete lines
//! ```
//!
//! Each chunk is split on `\n`. The segment at its start has no known
//! beginning yet and becomes the carry; the segment at its end is completed
//! by the carry of the previously read (later) chunk. When a chunk ends
//! exactly on a separator that last segment is empty, so the carry is
//! emitted on its own.
//!
//! A line spanning many chunks is kept as a list of fragments and joined
//! once, when its start is found.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::trace;

use super::{trim_cr, DEFAULT_CHUNK_SIZE};
use crate::error::{Result, SensorError};

/// Lazy iterator over the lines of a log in reverse order.
///
/// Not restartable: every traversal opens its own handle via [`ReverseLines::open`].
pub struct ReverseLines<R = File> {
    source: R,
    path: PathBuf,
    chunk_size: usize,
    /// Length of the still unread prefix of the file.
    remaining: u64,
    /// Fragments of the line still waiting for its beginning, latest first.
    carry: Vec<Vec<u8>>,
    /// Complete lines of the last chunk, latest first.
    ready: VecDeque<Vec<u8>>,
    chunk: Vec<u8>,
    started: bool,
    finished: bool,
}

impl ReverseLines<File> {
    /// Open `path` for a backward traversal with the default chunk size.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Open `path` for a backward traversal reading `chunk_size` bytes at a time.
    pub fn open_with_chunk_size<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SensorError::open(path, e))?;
        Self::from_reader(file, path, chunk_size)
    }
}

impl<R: Read + Seek> ReverseLines<R> {
    /// Traverse any seekable source; `label` is used in error messages.
    pub fn from_reader(mut source: R, label: impl Into<PathBuf>, chunk_size: usize) -> Result<Self> {
        let path = label.into();
        let len = source
            .seek(SeekFrom::End(0))
            .map_err(|e| SensorError::read(&path, e))?;

        Ok(Self {
            source,
            path,
            chunk_size: chunk_size.max(1),
            remaining: len,
            carry: Vec::new(),
            ready: VecDeque::new(),
            chunk: Vec::new(),
            started: false,
            finished: false,
        })
    }

    fn read_chunk(&mut self) -> Result<()> {
        let n = self.remaining.min(self.chunk_size as u64);
        let start = self.remaining - n;

        self.chunk.resize(n as usize, 0);
        self.source
            .seek(SeekFrom::Start(start))
            .and_then(|_| self.source.read_exact(&mut self.chunk))
            .map_err(|e| SensorError::read(&self.path, e))?;
        self.remaining = start;

        // The final separator of the file terminates the last line, it does
        // not open an empty one.
        if !self.started {
            self.started = true;
            if self.chunk.last() == Some(&b'\n') {
                self.chunk.pop();
            }
        }

        let chunk = std::mem::take(&mut self.chunk);
        let mut segments = chunk.rsplit(|&b| b == b'\n');
        let tail = segments.next().unwrap_or(&[]);
        let rest: Vec<&[u8]> = segments.collect();

        self.carry.push(tail.to_vec());

        if let Some((head, middle)) = rest.split_last() {
            let line = self.take_carry();
            self.ready.push_back(line);
            self.ready.extend(middle.iter().map(|seg| seg.to_vec()));
            self.carry.push(head.to_vec());
        }
        self.chunk = chunk;
        Ok(())
    }

    fn take_carry(&mut self) -> Vec<u8> {
        let fragments = std::mem::take(&mut self.carry);
        let mut line = Vec::with_capacity(fragments.iter().map(Vec::len).sum());
        for fragment in fragments.iter().rev() {
            line.extend_from_slice(fragment);
        }
        line
    }
}

impl<R: Read + Seek> Iterator for ReverseLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(bytes) = self.ready.pop_front() {
                return Some(Ok(decode(bytes)));
            }
            if self.finished {
                return None;
            }
            if self.remaining == 0 {
                self.finished = true;
                if !self.started {
                    return None;
                }
                return Some(Ok(decode(self.take_carry())));
            }
            if let Err(e) = self.read_chunk() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}

/// Decode one line; an undecodable line is replaced by an empty one so a
/// single bad byte range never aborts a scan.
fn decode(mut bytes: Vec<u8>) -> String {
    trim_cr(&mut bytes);
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            trace!(
                len = e.as_bytes().len(),
                "Undecodable line replaced by an empty line"
            );
            String::new()
        }
    }
}
