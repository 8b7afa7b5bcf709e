//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// Index of a source unit inside a [`crate::PositionIndex`], in merge order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// One input file: its full text and a stable identifier (its resolved path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Full file content
    pub text: String,
    /// File path or other stable identifier
    pub identifier: String,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, identifier: impl Into<String>) -> Self {
        SourceUnit {
            text: text.into(),
            identifier: identifier.into(),
        }
    }
}

/// Maps one line of the merged text to the line it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Line in the merged text (1-indexed)
    pub merged_line: usize,
    /// Unit the line belongs to
    pub file_id: FileId,
    /// Line within that unit (1-indexed)
    pub source_line: usize,
}
