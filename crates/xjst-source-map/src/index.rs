//! Position index from merged lines back to source lines

use crate::file_info::FileInformation;
use crate::types::{FileId, LineRecord, SourceUnit};
use serde::{Deserialize, Serialize};

/// A source unit registered in the index together with its line table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IndexedUnit {
    unit: SourceUnit,
    file_info: FileInformation,
}

/// Per-line mapping from the merged text to the original units
///
/// Holds exactly one [`LineRecord`] per merged line. Record `k` (0-based)
/// always describes merged line `k + 1`, so lookups are direct indexing.
/// Only line numbers are mapped; columns are never shifted because every
/// unit starts on a fresh merged line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionIndex {
    units: Vec<IndexedUnit>,
    records: Vec<LineRecord>,
}

/// An original position recovered from a merged position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition<'a> {
    /// Unit the position belongs to
    pub file_id: FileId,
    /// Identifier (path) of that unit
    pub identifier: &'a str,
    /// Line within the unit (1-indexed)
    pub source_line: usize,
    /// Column, passed through unchanged
    pub column: usize,
    /// Full text of the unit
    pub source_text: &'a str,
}

impl PositionIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next unit and record one line per line it occupies
    ///
    /// Returns the unit's id and the number of merged lines it occupies.
    /// An empty unit still occupies one (empty) line.
    pub(crate) fn push_unit(&mut self, unit: SourceUnit) -> (FileId, usize) {
        let file_id = FileId(self.units.len());
        let file_info = FileInformation::new(&unit.text);
        let occupied = file_info.line_count().max(1);

        let first_merged_line = self.records.len() + 1;
        self.records
            .extend((0..occupied).map(|local| LineRecord {
                merged_line: first_merged_line + local,
                file_id,
                source_line: local + 1,
            }));
        self.units.push(IndexedUnit { unit, file_info });

        (file_id, occupied)
    }

    /// Number of merged lines covered by the index
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All line records, ordered by merged line
    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Get the record for a merged line (1-indexed)
    pub fn record(&self, merged_line: usize) -> Option<&LineRecord> {
        merged_line
            .checked_sub(1)
            .and_then(|idx| self.records.get(idx))
    }

    /// Get a unit by id
    pub fn unit(&self, file_id: FileId) -> Option<&SourceUnit> {
        self.units.get(file_id.0).map(|u| &u.unit)
    }

    /// Iterate over the units in merge order
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.units.iter().map(|u| &u.unit)
    }

    /// Text of one line (1-indexed) of a unit, without its terminator
    pub fn line_text(&self, file_id: FileId, line: usize) -> Option<&str> {
        let indexed = self.units.get(file_id.0)?;
        indexed.file_info.line_text(line, &indexed.unit.text)
    }

    /// Map a merged position back to its original unit
    ///
    /// Returns None when `merged_line` is not covered by the index, for
    /// example when it points into code appended after the real sources.
    /// Callers must then keep the unresolved position instead of guessing.
    ///
    /// # Example
    ///
    /// ```
    /// use xjst_source_map::{SourceUnit, merge};
    ///
    /// let merged = merge(vec![SourceUnit::new("a\nb\n", "f1")]);
    /// let pos = merged.index.resolve(2, 5).unwrap();
    /// assert_eq!((pos.identifier, pos.source_line, pos.column), ("f1", 2, 5));
    /// assert!(merged.index.resolve(3, 1).is_none());
    /// ```
    pub fn resolve(&self, merged_line: usize, column: usize) -> Option<ResolvedPosition<'_>> {
        let record = self.record(merged_line)?;
        let unit = self.unit(record.file_id)?;

        Some(ResolvedPosition {
            file_id: record.file_id,
            identifier: &unit.identifier,
            source_line: record.source_line,
            column,
            source_text: &unit.text,
        })
    }
}
