/*
 * stage.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The XJST build stage.
 */

//! The XJST build stage.
//!
//! [`XjstStage`] builds one target from an ordered list of template files:
//! read, merge, append the scaffolding, submit one compile job, then either
//! bundle the result or translate the failure back to the user's files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use xjst_error_reporting::{ContextOptions, normalize_path, translate_with};
use xjst_source_map::{LINE_TERMINATOR, MergedUnit, SourceUnit, merge};

use crate::bundle;
use crate::config::XjstOptions;
use crate::error::{BuildError, Result};
use crate::job::CompileJobClient;

/// Template appended after the user's templates.
///
/// Gives every template `this.require(name)`, backed by the bundle's
/// `__xjst_libs__`.
pub const SCAFFOLDING: [&str; 3] = [
    "this._mode === \"\", !this.require: applyNext(this.require = function (lib) {",
    "    return __xjst_libs__[lib];",
    "})",
];

/// The merged text followed by [`SCAFFOLDING`].
///
/// A blank line separates the two. Everything after the last indexed line
/// is outside the index, so compiler errors there never resolve to a user
/// file.
pub fn with_scaffolding(merged: &MergedUnit) -> String {
    let mut code = merged.text.clone();
    code.push_str(LINE_TERMINATOR);
    code.push_str(&SCAFFOLDING.join(LINE_TERMINATOR));
    code
}

/// Expand a target pattern: `?` becomes the name of `dir`.
///
/// ```
/// use std::path::Path;
/// use xjst_core::target_file_name;
///
/// assert_eq!(target_file_name("?.bemhtml.js", Path::new("bundles/index")), "index.bemhtml.js");
/// ```
pub fn target_file_name(pattern: &str, dir: &Path) -> String {
    let name = dir.file_name().unwrap_or_default().to_string_lossy();
    pattern.replace('?', &name)
}

/// Absolute, lexically normalized form of `path`.
///
/// Relative paths are taken against the current directory. If that cannot
/// be determined the path is only normalized.
fn resolve_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&absolute)
}

/// Builds XJST targets through a [`CompileJobClient`].
///
/// The stage holds configuration only; each build owns its own merged unit
/// and index, so one stage can run several builds concurrently.
pub struct XjstStage {
    options: XjstOptions,
    client: Arc<dyn CompileJobClient>,
    root: PathBuf,
    context: ContextOptions,
}

impl XjstStage {
    /// Create a stage. Error paths are reported relative to `root`.
    ///
    /// A relative `root` is resolved against the current directory.
    pub fn new(
        options: XjstOptions,
        client: Arc<dyn CompileJobClient>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            options,
            client,
            root: resolve_path(&root.into()),
            context: ContextOptions::default(),
        }
    }

    /// Use different excerpt settings in translated errors.
    pub fn with_context_options(mut self, context: ContextOptions) -> Self {
        self.context = context;
        self
    }

    pub fn options(&self) -> &XjstOptions {
        &self.options
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read template files concurrently, keeping their order.
    ///
    /// The identifier of each unit is its absolute path.
    pub async fn read_sources(&self, files: &[PathBuf]) -> Result<Vec<SourceUnit>> {
        try_join_all(files.iter().map(|path| async move {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| BuildError::Read {
                    path: path.clone(),
                    source,
                })?;
            Ok::<_, BuildError>(SourceUnit::new(
                text,
                resolve_path(path).to_string_lossy(),
            ))
        }))
        .await
    }

    /// Build a module from template files, for a bundle living in `dirname`.
    pub async fn build(&self, files: &[PathBuf], dirname: &Path) -> Result<String> {
        let units = self.read_sources(files).await?;
        self.build_units(units, dirname).await
    }

    /// Build a module from already loaded templates.
    pub async fn build_units(&self, units: Vec<SourceUnit>, dirname: &Path) -> Result<String> {
        let file_count = units.len();
        let merged = merge(units);
        let code = with_scaffolding(&merged);

        tracing::debug!(
            files = file_count,
            lines = merged.line_count(),
            export = ?self.options.export_name,
            "Merged XJST templates"
        );
        tracing::info!("Calm down, OmetaJS is running...");

        match self
            .client
            .submit(code, &self.options.compile_config())
            .await
        {
            Ok(compiled) => {
                let module = bundle::compile(&compiled, &self.options.bundle_options(dirname))?;
                Ok(module)
            }
            Err(failure) => {
                Err(translate_with(failure, &merged.index, &self.root, &self.context).into())
            }
        }
    }

    /// Build and write the module to `target_dir`, named after the target pattern.
    ///
    /// Returns the path written.
    pub async fn build_to_target(&self, files: &[PathBuf], target_dir: &Path) -> Result<PathBuf> {
        let module = self.build(files, target_dir).await?;
        let target = target_dir.join(target_file_name(self.options.target(), target_dir));

        tokio::fs::write(&target, module)
            .await
            .map_err(|source| BuildError::Write {
                path: target.clone(),
                source,
            })?;

        tracing::info!(target = %target.display(), "Wrote XJST bundle");
        Ok(target)
    }
}
