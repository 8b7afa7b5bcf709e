//! Translation of compiler failures back to original sources.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use xjst_source_map::PositionIndex;

use crate::context::{ContextOptions, render_context};
use crate::failure::CompileFailure;
use crate::message::{clean_message, display_path};

/// A compiler error that points at the user's own file.
///
/// `message` has the shape `"<cleaned message> at <path>\n<context>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedError {
    /// Full user-facing message, excerpt included
    pub message: String,
    /// Path of the offending file as shown in the message
    pub path: String,
    /// Line in the offending file (1-indexed)
    pub line: usize,
    /// Column in the offending file (1-indexed)
    pub column: usize,
}

impl std::fmt::Display for PositionedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PositionedError {}

/// Outcome of translating a compiler failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The failure was resolved to an original file
    #[error(transparent)]
    Syntax(PositionedError),

    /// The failure could not be resolved and is passed through untouched
    #[error(transparent)]
    Compile(CompileFailure),
}

/// Translate a compiler failure using the default excerpt options.
///
/// See [`translate_with`].
pub fn translate(failure: CompileFailure, index: &PositionIndex, root: &Path) -> CompileError {
    translate_with(failure, index, root, &ContextOptions::default())
}

/// Translate a compiler failure into an error pointing at the original file.
///
/// A positioned failure whose line is covered by `index` becomes a
/// [`CompileError::Syntax`] with the cleaned message, the file path relative
/// to `root` and an excerpt of the offending line. Everything else
/// (unpositioned failures, and positions outside the indexed range such as
/// the appended scaffolding) comes back as [`CompileError::Compile`] with
/// the failure unchanged. No failure is ever dropped.
pub fn translate_with(
    failure: CompileFailure,
    index: &PositionIndex,
    root: &Path,
    options: &ContextOptions,
) -> CompileError {
    let Some((line, column)) = failure.position() else {
        return CompileError::Compile(failure);
    };

    let Some(original) = index.resolve(line, column) else {
        return CompileError::Compile(failure);
    };

    let path = display_path(root, Path::new(original.identifier));
    let context = render_context(
        original.source_text,
        original.source_line,
        original.column,
        options,
    );

    CompileError::Syntax(PositionedError {
        message: format!("{} at {}\n{}", clean_message(failure.message()), path, context),
        path,
        line: original.source_line,
        column: original.column,
    })
}
