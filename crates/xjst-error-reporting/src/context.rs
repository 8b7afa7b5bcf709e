//! Source excerpts pointing at a line and column.

use xjst_source_map::FileInformation;

/// Options for [`render_context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextOptions {
    /// Prefix written before every excerpt line
    pub indent: String,
    /// Number of lines shown before and after the offending line
    pub lines_around: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            lines_around: 0,
        }
    }
}

/// Render the offending line of `source` with a caret under `column`.
///
/// `line` and `column` are 1-indexed. The caret line mirrors the tabs of the
/// source line so the caret stays aligned; positions past the end of the
/// line are padded with spaces. A line that does not exist renders as an
/// empty line, so the caret is still shown.
///
/// # Example
///
/// ```
/// use xjst_error_reporting::{ContextOptions, render_context};
///
/// let excerpt = render_context("a\nb\n", 2, 5, &ContextOptions::default());
/// assert_eq!(excerpt, "    b\n        ^");
/// ```
pub fn render_context(source: &str, line: usize, column: usize, options: &ContextOptions) -> String {
    let info = FileInformation::new(source);
    let first = line.saturating_sub(options.lines_around).max(1);
    let last = line
        .saturating_add(options.lines_around)
        .min(line.max(info.line_count()));

    let mut rendered: Vec<String> = Vec::new();
    for current in first..=last {
        let text = info.line_text(current, source);
        if current == line {
            let text = text.unwrap_or_default();
            rendered.push(format!("{}{}", options.indent, text));
            rendered.push(format!("{}{}^", options.indent, caret_padding(text, column)));
        } else if let Some(text) = text {
            rendered.push(format!("{}{}", options.indent, text));
        }
    }

    rendered.join("\n")
}

/// Furthest the caret may be drawn past the end of its line
const MAX_CARET_OVERHANG: usize = 80;

/// Whitespace that moves the caret to `column` (1-indexed) under `text`.
///
/// Columns far past the end of the line are clamped.
fn caret_padding(text: &str, column: usize) -> String {
    let width = column
        .saturating_sub(1)
        .min(text.chars().count() + MAX_CARET_OVERHANG);
    let mut chars = text.chars();

    (0..width)
        .map(|_| match chars.next() {
            Some('\t') => '\t',
            _ => ' ',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_at_first_column() {
        let excerpt = render_context("block b", 1, 1, &ContextOptions::default());
        assert_eq!(excerpt, "    block b\n    ^");
    }

    #[test]
    fn test_column_zero_is_treated_as_first_column() {
        let excerpt = render_context("x", 1, 0, &ContextOptions::default());
        assert_eq!(excerpt, "    x\n    ^");
    }

    #[test]
    fn test_caret_mirrors_tabs() {
        let excerpt = render_context("\t\tfoo", 1, 4, &ContextOptions::default());
        assert_eq!(excerpt, "    \t\tfoo\n    \t\t ^");
    }

    #[test]
    fn test_custom_indent() {
        let options = ContextOptions {
            indent: "> ".to_string(),
            lines_around: 0,
        };
        assert_eq!(render_context("abc", 1, 3, &options), "> abc\n>   ^");
    }

    #[test]
    fn test_lines_around() {
        let options = ContextOptions {
            lines_around: 1,
            ..Default::default()
        };
        let excerpt = render_context("one\ntwo\nthree\nfour", 2, 2, &options);
        assert_eq!(excerpt, "    one\n    two\n     ^\n    three");
    }

    #[test]
    fn test_lines_around_clamped_at_file_edges() {
        let options = ContextOptions {
            lines_around: 3,
            ..Default::default()
        };
        let excerpt = render_context("one\ntwo", 1, 1, &options);
        assert_eq!(excerpt, "    one\n    ^\n    two");
    }

    #[test]
    fn test_huge_column_is_clamped() {
        let excerpt = render_context("abc", 1, 1_000_000_000_000, &ContextOptions::default());
        let caret_line = excerpt.lines().nth(1).unwrap();
        assert_eq!(caret_line.len(), 4 + 3 + MAX_CARET_OVERHANG + 1);
        assert!(caret_line.ends_with('^'));
    }

    #[test]
    fn test_huge_lines_around_stops_at_file_end() {
        let options = ContextOptions {
            lines_around: usize::MAX,
            ..Default::default()
        };
        let excerpt = render_context("one\ntwo", 2, 1, &options);
        assert_eq!(excerpt, "    one\n    two\n    ^");
    }

    #[test]
    fn test_missing_line_renders_empty() {
        let excerpt = render_context("one", 5, 2, &ContextOptions::default());
        assert_eq!(excerpt, "    \n     ^");
    }
}
