//! Line traversal over CI job logs.
//!
//! Two independent directions are needed:
//! - [`LogLines`] walks a log front to back for status extraction
//! - [`ReverseLines`] walks it back to front for failure classification,
//!   holding at most one chunk plus one partial line in memory
//!
//! Both split on `\n`, drop a trailing `\r`, and do not report an empty
//! line after a final separator, so reversing one yields the other.

mod backward;
mod forward;

pub use backward::ReverseLines;
pub use forward::{LogLine, LogLines};

/// Default chunk size for backward reads (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Remove a trailing carriage return left over from CRLF line endings.
pub(crate) fn trim_cr(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
}
