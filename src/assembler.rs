//! Suggestion Assembler for suggest_core
//!
//! Only the text after the last pipeline/assignment boundary is completed.
//! Everything before it, and the whitespace that leads into it, is put back
//! around the completion untouched.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEGMENT_SEPARATOR: Regex = Regex::new(r"[|=]|&&").unwrap();
}

/// A raw input line split at its last segment separator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailingSegment<'a> {
    /// Everything up to and including the last separator
    pub head: &'a str,
    /// Whitespace between the separator (or line start) and the text
    pub indent: &'a str,
    /// The segment text handed to the matcher
    pub text: &'a str,
}

impl<'a> TrailingSegment<'a> {
    pub fn parse(line: &'a str) -> Self {
        let split_at = SEGMENT_SEPARATOR
            .find_iter(line)
            .last()
            .map(|m| m.end())
            .unwrap_or(0);

        let (head, segment) = line.split_at(split_at);
        let text = segment.trim_start();
        let indent = &segment[..segment.len() - text.len()];

        Self { head, indent, text }
    }

    /// Nothing but whitespace after the last separator
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Rebuild the full line with `completion` in place of the segment text
    pub fn rejoin(&self, completion: &str) -> String {
        let mut line = String::with_capacity(self.head.len() + self.indent.len() + completion.len());
        line.push_str(self.head);
        line.push_str(self.indent);
        line.push_str(completion);
        line
    }
}
