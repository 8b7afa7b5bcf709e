//! Error types for xjst-core

use std::path::PathBuf;

use thiserror::Error;
use xjst_error_reporting::{CompileError, CompileFailure, PositionedError};

use crate::bundle::BundleError;

#[derive(Error, Debug)]
pub enum BuildError {
    /// A template file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A compiler error resolved to the user's own file.
    #[error(transparent)]
    Syntax(PositionedError),

    /// A compiler error that could not be resolved, passed through as is.
    #[error(transparent)]
    Compile(CompileFailure),

    #[error("Bundling failed: {0}")]
    Bundle(#[from] BundleError),

    /// The bundle could not be written to its target.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<CompileError> for BuildError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Syntax(positioned) => BuildError::Syntax(positioned),
            CompileError::Compile(failure) => BuildError::Compile(failure),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
