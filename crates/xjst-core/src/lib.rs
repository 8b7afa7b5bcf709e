/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * XJST template bundling stage.
 */

//! XJST template bundling stage
//!
//! This crate turns an ordered list of XJST template files into one bundled
//! JavaScript module:
//!
//! ```text
//! files → read → merge (+ PositionIndex) → + scaffolding → compile job → bundle
//!                                                              │
//!                                                              └─ failure → translate
//! ```
//!
//! # Key Types
//!
//! - [`XjstStage`] - Runs the whole flow for one target
//! - [`XjstOptions`] - User-facing configuration of a target
//! - [`CompileJobClient`] - Seam to the compiler worker (one request, one result)
//! - [`JobQueue`] - Worker-pool implementation of [`CompileJobClient`]
//! - [`ProcessCompiler`] - Runs the XJST processor as a Node.js subprocess
//! - [`BuildError`] - Everything that can fail, with compiler errors mapped
//!   back to the user's files when possible
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use xjst_core::{JobQueue, ProcessCompiler, XjstOptions, XjstStage};
//!
//! let compiler = Arc::new(ProcessCompiler::discover(None)?);
//! let queue = Arc::new(JobQueue::new(compiler, 4));
//! let stage = XjstStage::new(XjstOptions::bemhtml(), queue, "/project");
//!
//! let module = stage.build(&files, Path::new("/project/bundles/index")).await?;
//! ```

pub mod bundle;
pub mod config;
pub mod error;
pub mod job;
pub mod stage;

// Re-export commonly used types
pub use bundle::BundleError;
pub use config::{BundleOptions, CompileConfig, ConfigError, DEFAULT_TARGET, XjstOptions};
pub use error::{BuildError, Result};
pub use job::{
    CompileJobClient, CompiledTemplate, JobQueue, ProcessCompiler, TemplateCompiler,
};
pub use stage::{SCAFFOLDING, XjstStage, target_file_name, with_scaffolding};

// Error-reporting types that appear in this crate's API
pub use xjst_error_reporting::{CompileFailure, ContextOptions, PositionedError};
