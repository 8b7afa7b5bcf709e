//! Source mapping for merged XJST template units
//!
//! Template files are compiled as one concatenated unit. This crate builds
//! that unit and keeps a line-level index from every line of the merged text
//! back to the file and line it came from, so compiler errors can point at
//! the user's own source.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceUnit`]: One input file's text and its identifier (path)
//! - [`PositionIndex`]: Per-line table from merged lines to source lines
//! - [`MergedUnit`]: The merged text together with its index
//!
//! # Example
//!
//! ```rust
//! use xjst_source_map::*;
//!
//! let merged = merge(vec![
//!     SourceUnit::new("a\nb\n", "f1"),
//!     SourceUnit::new("c\n", "f2"),
//! ]);
//!
//! let resolved = merged.index.resolve(3, 1).unwrap();
//! assert_eq!(resolved.identifier, "f2");
//! assert_eq!(resolved.source_line, 1);
//! ```

pub mod file_info;
pub mod index;
pub mod merge;
pub mod types;

// Re-export main types
pub use file_info::FileInformation;
pub use index::{PositionIndex, ResolvedPosition};
pub use merge::{LINE_TERMINATOR, MergedUnit, merge};
pub use types::{FileId, LineRecord, SourceUnit};
