//! Line normalizer: strips terminal escape sequences before matching.
//!
//! CI runners colourise status markers (`ESC[0;32m[ pass ]ESC[0m`), which
//! would otherwise defeat every pattern. The line is fed through a `vte`
//! parser; only printable characters and horizontal tabs survive. Tabs are
//! significant: test-run separates a timeout notice from its status with one.

use std::borrow::Cow;

use vte::{Params, Parser, Perform};

/// Escape-sequence stripper that keeps count of what it removed.
pub struct LineNormalizer {
    sequences_stripped: usize,
}

impl LineNormalizer {
    pub fn new() -> Self {
        Self {
            sequences_stripped: 0,
        }
    }

    /// Return `line` without escape sequences and control characters.
    ///
    /// Lines without any control byte are returned borrowed.
    pub fn normalize<'a>(&mut self, line: &'a str) -> Cow<'a, str> {
        if !needs_cleaning(line) {
            return Cow::Borrowed(line);
        }

        // A fresh parser per line: an unterminated sequence must not leak
        // into the next line.
        let mut parser: Parser = Parser::new();
        let mut performer = StripPerformer {
            out: String::with_capacity(line.len()),
            sequences: 0,
        };
        parser.advance(&mut performer, line.as_bytes());
        self.sequences_stripped += performer.sequences;

        Cow::Owned(performer.out)
    }

    /// Number of escape sequences removed so far.
    pub fn sequences_stripped(&self) -> usize {
        self.sequences_stripped
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip escape sequences from a single line.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    LineNormalizer::new().normalize(line)
}

fn needs_cleaning(line: &str) -> bool {
    line.bytes()
        .any(|b| (b < 0x20 && b != b'\t') || b == 0x7f)
        || line.chars().any(|c| ('\u{0080}'..='\u{009F}').contains(&c))
}

/// Collects printable output and counts the sequences it swallows.
struct StripPerformer {
    out: String,
    sequences: usize,
}

impl Perform for StripPerformer {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\t' {
            self.out.push('\t');
        }
    }

    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {
        self.sequences += 1;
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {
        self.sequences += 1;
    }

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        self.sequences += 1;
    }
}
