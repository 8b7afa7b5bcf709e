//! Concatenation of source units into one merged unit

use crate::index::PositionIndex;
use crate::types::SourceUnit;

/// The platform line terminator used when joining units
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Merged text together with the index describing where each line came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedUnit {
    pub text: String,
    pub index: PositionIndex,
}

impl MergedUnit {
    /// Number of lines contributed by the source units
    pub fn line_count(&self) -> usize {
        self.index.len()
    }
}

/// Concatenate units in the given order and index every produced line
///
/// Each unit starts on a fresh line: a unit whose text does not already end
/// with a line terminator gets [`LINE_TERMINATOR`] appended. Two units are
/// therefore never joined on one line, which is what lets positions be
/// mapped by line offset alone.
///
/// The order is taken verbatim from the caller, so the same inputs always
/// produce the same text and the same index. An empty list produces an
/// empty text and an empty index.
pub fn merge(units: Vec<SourceUnit>) -> MergedUnit {
    let capacity = units
        .iter()
        .map(|u| u.text.len() + LINE_TERMINATOR.len())
        .sum();
    let mut text = String::with_capacity(capacity);
    let mut index = PositionIndex::new();

    for unit in units {
        text.push_str(&unit.text);
        if !unit.text.ends_with('\n') {
            text.push_str(LINE_TERMINATOR);
        }
        index.push_unit(unit);
    }

    MergedUnit { text, index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileId;

    fn units(specs: &[(&str, &str)]) -> Vec<SourceUnit> {
        specs
            .iter()
            .map(|(text, id)| SourceUnit::new(*text, *id))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let merged = merge(Vec::new());
        assert_eq!(merged.text, "");
        assert!(merged.index.is_empty());
    }

    #[test]
    fn test_two_units_map_each_line() {
        let merged = merge(units(&[("a\nb\n", "f1"), ("c\n", "f2")]));
        assert_eq!(merged.text, "a\nb\nc\n");
        assert_eq!(merged.line_count(), 3);

        let expected = [(1, "f1", 1), (2, "f1", 2), (3, "f2", 1)];
        for (merged_line, identifier, source_line) in expected {
            let pos = merged.index.resolve(merged_line, 1).unwrap();
            assert_eq!(pos.identifier, identifier);
            assert_eq!(pos.source_line, source_line);
        }
        assert!(merged.index.resolve(4, 1).is_none());
    }

    #[test]
    fn test_unterminated_unit_gets_a_terminator() {
        let merged = merge(units(&[("a\nb", "f1"), ("c", "f2")]));
        let expected_text = format!("a\nb{LINE_TERMINATOR}c{LINE_TERMINATOR}");
        assert_eq!(merged.text, expected_text);

        let pos = merged.index.resolve(3, 1).unwrap();
        assert_eq!((pos.identifier, pos.source_line), ("f2", 1));
    }

    #[test]
    fn test_every_line_boundary() {
        let inputs = units(&[
            ("1\n2\n3\n", "first"),
            ("4", "second"),
            ("", "third"),
            ("6\n7\n8\n9", "fourth"),
        ]);
        let merged = merge(inputs.clone());

        // Merged line count is the sum of each unit's occupied lines
        assert_eq!(merged.line_count(), 3 + 1 + 1 + 4);
        assert_eq!(merged.text.lines().count(), merged.line_count());

        let mut merged_line = 0;
        for (id, unit) in inputs.iter().enumerate() {
            let occupied = unit.text.lines().count().max(1);
            for local in 1..=occupied {
                merged_line += 1;
                let record = merged.index.record(merged_line).unwrap();
                assert_eq!(record.file_id, FileId(id));
                assert_eq!(record.source_line, local);
                assert_eq!(record.merged_line, merged_line);
            }
        }
        assert!(merged.index.resolve(merged_line + 1, 1).is_none());
    }

    #[test]
    fn test_resolution_depends_on_line_counts_only() {
        let original = merge(units(&[("aaa\nbbb\n", "f1"), ("ccc\n", "f2")]));
        let edited = merge(units(&[("x\nsomething longer\n", "f1"), ("\n", "f2")]));

        for line in 1..=3 {
            let before = original.index.resolve(line, 2).unwrap();
            let after = edited.index.resolve(line, 2).unwrap();
            assert_eq!(before.identifier, after.identifier);
            assert_eq!(before.source_line, after.source_line);
        }
    }

    #[test]
    fn test_column_is_passed_through() {
        let merged = merge(units(&[("a\nb\n", "f1")]));
        for column in [0, 1, 5, 120] {
            let pos = merged.index.resolve(2, column).unwrap();
            assert_eq!(pos.source_line, 2);
            assert_eq!(pos.column, column);
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let inputs = units(&[("a\nb\n", "f1"), ("c", "f2"), ("d\ne", "f3")]);
        let first = merge(inputs.clone());
        let second = merge(inputs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_crlf_units_keep_their_terminators() {
        let merged = merge(units(&[("a\r\nb\r\n", "f1"), ("c\r\n", "f2")]));
        assert_eq!(merged.text, "a\r\nb\r\nc\r\n");
        let pos = merged.index.resolve(3, 1).unwrap();
        assert_eq!((pos.identifier, pos.source_line), ("f2", 1));
    }
}
