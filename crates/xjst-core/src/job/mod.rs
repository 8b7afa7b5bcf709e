/*
 * job/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile job abstraction.
 */

//! Compile jobs.
//!
//! A compile job is one request/response cycle with the template compiler:
//! the merged template text and a [`CompileConfig`] go in, compiled code or a
//! [`CompileFailure`] comes out. Nothing is retried and nothing is cached at
//! this layer.
//!
//! Two seams are defined here:
//!
//! - [`CompileJobClient`] is what the stage talks to. It is async, and each
//!   call delivers exactly one result to its own caller, even when many
//!   calls are in flight.
//! - [`TemplateCompiler`] is the blocking compiler itself. [`JobQueue`] runs
//!   one on a pool of workers and exposes it as a [`CompileJobClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use xjst_error_reporting::CompileFailure;

use crate::config::CompileConfig;

mod process;
mod queue;

pub use process::ProcessCompiler;
pub use queue::JobQueue;

/// Compiled template code, opaque to this crate until it is bundled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledTemplate(pub String);

impl CompiledTemplate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Client for submitting compile jobs.
///
/// Implementations must be `Send + Sync` so one client can serve several
/// targets being built concurrently.
#[async_trait]
pub trait CompileJobClient: Send + Sync {
    /// Submit one unit of work and wait for its result.
    async fn submit(
        &self,
        payload: String,
        config: &CompileConfig,
    ) -> Result<CompiledTemplate, CompileFailure>;
}

/// A blocking template compiler.
///
/// Called from worker threads, never from async tasks directly.
pub trait TemplateCompiler: Send + Sync {
    fn compile(
        &self,
        payload: &str,
        config: &CompileConfig,
    ) -> Result<CompiledTemplate, CompileFailure>;
}
