/*
 * job/process.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * XJST processor subprocess.
 */

//! Runs the XJST processor as a Node.js subprocess.
//!
//! # Finding Node.js
//!
//! [`find_node`] looks in this order:
//! 1. `XJST_NODE` environment variable (path to the node binary)
//! 2. System PATH via `which`
//!
//! # Processor Protocol
//!
//! The request is written to stdin and the response read from stdout:
//!
//! ```json
//! // Request (stdin)
//! {
//!   "source": "<merged templates + scaffolding>",
//!   "options": { "exportName": "BEMHTML", "applyFuncName": "apply" }
//! }
//!
//! // Response (stdout), success
//! { "result": "<compiled javascript>" }
//!
//! // Response (stdout), failure
//! { "error": { "message": "Unexpected token at: 12:4", "line": 12, "column": 4 } }
//! ```
//!
//! Only the options that are set appear in `options`; the compiler applies
//! its own defaults for the rest.
//!
//! The processor script is bundled with this crate and passed with `-e`
//! unless a script path is configured (`XJST_PROCESSOR` or
//! [`ProcessCompiler::with_processor`]).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use xjst_error_reporting::{CompileFailure, RawCompileFailure};

use super::{CompiledTemplate, TemplateCompiler};
use crate::config::CompileConfig;

/// The bundled processor script
const PROCESSOR_SCRIPT: &str = include_str!("../../js/xjst-processor.js");

/// Longest stderr excerpt carried into a failure message
const MAX_STDERR_IN_MESSAGE: usize = 2000;

#[derive(Debug, Serialize)]
struct ProcessorRequest<'a> {
    source: &'a str,
    options: &'a CompileConfig,
}

#[derive(Debug, Deserialize)]
struct ProcessorResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RawCompileFailure>,
}

/// Find the node binary on the system.
///
/// `XJST_NODE` wins when it points at an existing file; otherwise `node` is
/// looked up on PATH.
pub fn find_node() -> Option<PathBuf> {
    if let Ok(node) = std::env::var("XJST_NODE") {
        let node = PathBuf::from(node);
        if node.is_file() {
            return Some(node);
        }
        tracing::warn!(path = %node.display(), "XJST_NODE does not point at a file, ignoring");
    }

    which::which("node").ok()
}

/// A [`TemplateCompiler`] that runs the XJST processor under Node.js.
///
/// Each call spawns a fresh process, so calls share no state.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    node: PathBuf,
    processor: Option<PathBuf>,
    working_dir: Option<PathBuf>,
}

impl ProcessCompiler {
    /// Use `node` with the bundled processor script.
    pub fn new(node: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            processor: None,
            working_dir: None,
        }
    }

    /// Find node on the system (see [`find_node`]).
    ///
    /// The processor script is `processor` if given, else `XJST_PROCESSOR`
    /// if set, else the bundled one.
    pub fn discover(processor: Option<PathBuf>) -> Option<Self> {
        let node = find_node()?;
        let processor = processor.or_else(|| std::env::var_os("XJST_PROCESSOR").map(PathBuf::from));

        Some(Self {
            node,
            processor,
            working_dir: None,
        })
    }

    /// Run this script instead of the bundled processor.
    pub fn with_processor(mut self, script: impl Into<PathBuf>) -> Self {
        self.processor = Some(script.into());
        self
    }

    /// Run the processor in `dir`; `require('xjst')` resolves from there.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn node(&self) -> &Path {
        &self.node
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.node);
        match &self.processor {
            Some(script) => cmd.arg(script),
            None => cmd.arg("-e").arg(PROCESSOR_SCRIPT),
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl TemplateCompiler for ProcessCompiler {
    fn compile(
        &self,
        payload: &str,
        config: &CompileConfig,
    ) -> Result<CompiledTemplate, CompileFailure> {
        let request = ProcessorRequest {
            source: payload,
            options: config,
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            CompileFailure::unpositioned(format!("Failed to serialize processor request: {}", e))
        })?;

        let mut child = self.command().spawn().map_err(|e| {
            CompileFailure::unpositioned(format!(
                "Failed to spawn XJST processor ({}): {}",
                self.node.display(),
                e
            ))
        })?;

        // The child is always reaped; a failed write is reported after it exits
        let write_error = child
            .stdin
            .take()
            .and_then(|mut stdin| stdin.write_all(request_json.as_bytes()).err());

        let output = child.wait_with_output().map_err(|e| {
            CompileFailure::unpositioned(format!("Failed to wait for XJST processor: {}", e))
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = truncate_for_error(stderr.trim(), MAX_STDERR_IN_MESSAGE);

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(CompileFailure::unpositioned(format!(
                "XJST processor failed (exit {}): {}",
                code, stderr
            )));
        }

        if let Some(e) = write_error {
            return Err(CompileFailure::unpositioned(format!(
                "Failed to write to XJST processor stdin: {}: {}",
                e, stderr
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Interpret the processor's stdout.
fn parse_response(stdout: &str) -> Result<CompiledTemplate, CompileFailure> {
    let response: ProcessorResponse = serde_json::from_str(stdout).map_err(|e| {
        CompileFailure::unpositioned(format!(
            "Failed to parse XJST processor output: {}\nOutput: {}",
            e,
            truncate_for_error(stdout, 500)
        ))
    })?;

    match response {
        ProcessorResponse {
            error: Some(error), ..
        } => Err(error.into()),
        ProcessorResponse {
            result: Some(code), ..
        } => Ok(CompiledTemplate(code)),
        _ => Err(CompileFailure::unpositioned(
            "XJST processor returned neither a result nor an error",
        )),
    }
}

/// Truncate a string for error messages, on a character boundary.
fn truncate_for_error(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
