//! Efficient line information for source units

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Line-break table for one piece of text
///
/// Stores the byte offset of every `\n` so that line lookups do not rescan
/// the text. A `\r` before the `\n` is treated as part of the terminator
/// when line text is extracted, so `\r\n` files behave like `\n` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character in the text
    line_breaks: Vec<usize>,

    /// Total length of the text in bytes
    total_length: usize,
}

impl FileInformation {
    /// Create line information by scanning the content once
    ///
    /// # Example
    ///
    /// ```
    /// use xjst_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("line 1\nline 2\nline 3");
    /// assert_eq!(info.line_count(), 3);
    /// ```
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .bytes()
            .enumerate()
            .filter_map(|(idx, b)| if b == b'\n' { Some(idx) } else { None })
            .collect();

        FileInformation {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Get the total length of the text in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Whether the text ends with a line terminator (or is empty)
    pub fn is_terminated(&self) -> bool {
        match self.line_breaks.last() {
            Some(&last) => last + 1 == self.total_length,
            None => self.total_length == 0,
        }
    }

    /// Get the number of lines in the text
    ///
    /// A trailing terminator ends the last line rather than opening a new
    /// one, so `"a\nb\n"` and `"a\nb"` both have two lines. Empty text has
    /// no lines.
    pub fn line_count(&self) -> usize {
        if self.is_terminated() {
            self.line_breaks.len()
        } else {
            self.line_breaks.len() + 1
        }
    }

    /// Byte range of a line (1-indexed), excluding its terminator
    ///
    /// Returns None when the line does not exist.
    pub fn line_range(&self, line: usize, content: &str) -> Option<Range<usize>> {
        if line == 0 || line > self.line_count() {
            return None;
        }

        let start = if line == 1 {
            0
        } else {
            self.line_breaks[line - 2] + 1
        };
        let mut end = self
            .line_breaks
            .get(line - 1)
            .copied()
            .unwrap_or(self.total_length);

        if end > start && content.as_bytes().get(end - 1) == Some(&b'\r') {
            end -= 1;
        }

        Some(start..end)
    }

    /// Text of a line (1-indexed) without its terminator
    ///
    /// `content` must be the text this information was built from.
    pub fn line_text<'a>(&self, line: usize, content: &'a str) -> Option<&'a str> {
        let range = self.line_range(line, content)?;
        content.get(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let info = FileInformation::new("");
        assert_eq!(info.total_length(), 0);
        assert_eq!(info.line_count(), 0);
        assert!(info.is_terminated());
        assert!(info.line_text(1, "").is_none());
    }

    #[test]
    fn test_single_unterminated_line() {
        let content = "hello world";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 1);
        assert!(!info.is_terminated());
        assert_eq!(info.line_text(1, content), Some("hello world"));
        assert!(info.line_text(2, content).is_none());
    }

    #[test]
    fn test_trailing_newline_does_not_open_a_line() {
        let content = "line 1\nline 2\n";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 2);
        assert!(info.is_terminated());
        assert_eq!(info.line_text(1, content), Some("line 1"));
        assert_eq!(info.line_text(2, content), Some("line 2"));
        assert!(info.line_text(3, content).is_none());
    }

    #[test]
    fn test_consecutive_newlines() {
        let content = "a\n\n\nb";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 4);
        assert_eq!(info.line_text(1, content), Some("a"));
        assert_eq!(info.line_text(2, content), Some(""));
        assert_eq!(info.line_text(3, content), Some(""));
        assert_eq!(info.line_text(4, content), Some("b"));
    }

    #[test]
    fn test_crlf_terminators_are_trimmed() {
        let content = "first\r\nsecond\r\n";
        let info = FileInformation::new(content);
        assert_eq!(info.line_count(), 2);
        assert_eq!(info.line_text(1, content), Some("first"));
        assert_eq!(info.line_text(2, content), Some("second"));
    }

    #[test]
    fn test_line_zero_is_out_of_range() {
        let info = FileInformation::new("x");
        assert!(info.line_range(0, "x").is_none());
    }

    #[test]
    fn test_unicode_content() {
        // "café" is 5 bytes; the second line starts at byte 6
        let content = "café\nwörld";
        let info = FileInformation::new(content);
        assert_eq!(info.line_range(2, content), Some(6..12));
        assert_eq!(info.line_text(2, content), Some("wörld"));
    }
}
