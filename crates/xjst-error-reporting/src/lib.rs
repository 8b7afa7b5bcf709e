//! Error reporting for merged XJST template units.
//!
//! The template compiler only ever sees the merged unit, so its errors point
//! at positions in that synthesized text. This crate turns them back into
//! errors that point at the user's own files:
//!
//! - [`CompileFailure`]: What the compiler reported, positioned or not
//! - [`translate`]: Maps a positioned failure through a
//!   [`xjst_source_map::PositionIndex`] into a [`PositionedError`]
//! - [`clean_message`], [`display_path`], [`render_context`]: The pure
//!   formatting pieces the translation is assembled from
//!
//! Failures are never suppressed. Anything that cannot be resolved to an
//! original file (no position, or a position inside appended scaffolding)
//! is passed through unchanged.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use xjst_error_reporting::{CompileError, CompileFailure, translate};
//! use xjst_source_map::{SourceUnit, merge};
//!
//! let merged = merge(vec![SourceUnit::new("a\nb\n", "/project/f1")]);
//! let failure = CompileFailure::positioned("Unexpected token at: 2:5", 2, 5);
//!
//! match translate(failure, &merged.index, Path::new("/project")) {
//!     CompileError::Syntax(err) => assert!(err.message.starts_with("Unexpected token at ./f1\n")),
//!     CompileError::Compile(_) => unreachable!(),
//! }
//! ```

pub mod context;
pub mod failure;
pub mod message;
pub mod translate;

pub use context::{ContextOptions, render_context};
pub use failure::{CompileFailure, RawCompileFailure};
pub use message::{clean_message, display_path, normalize_path, relative_path};
pub use translate::{CompileError, PositionedError, translate, translate_with};
