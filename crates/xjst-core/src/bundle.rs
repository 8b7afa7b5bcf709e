/*
 * bundle.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Wraps compiled templates into a loadable module.
 */

//! Module bundler.
//!
//! The compiled template code assigns its API (`apply`, ...) to an `exports`
//! object. [`compile`] wraps that code so the result loads under CommonJS,
//! YModules, or as a plain script that sets a global:
//!
//! ```text
//! (function (g) {
//!     var __xjst_libs__ = {}, Vow;        // filled from `requires` / `include_vow`
//!     var exports = {};
//!     (function (exports, __xjst_libs__, Vow) { <compiled> })(exports, __xjst_libs__, Vow);
//!     <export `exports` as exportName>
//! })(<global object>);
//! ```
//!
//! Templates reach the libraries through `this.require(name)`, which the
//! stage's scaffolding wires to `__xjst_libs__`.

use std::path::Path;

use thiserror::Error;
use xjst_error_reporting::normalize_path;

use crate::config::BundleOptions;
use crate::job::CompiledTemplate;

#[derive(Debug, Error)]
pub enum BundleError {
    /// The export name cannot be used as a JavaScript identifier.
    #[error("Invalid export name {0:?}: expected a JavaScript identifier")]
    InvalidExportName(String),

    #[error("Failed to encode string literal: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Wrap compiled template code into a module exposing `options.export_name`.
///
/// Without an export name the module can only be loaded through CommonJS,
/// where `module.exports` becomes the template object itself.
pub fn compile(compiled: &CompiledTemplate, options: &BundleOptions) -> Result<String, BundleError> {
    let export_name = match &options.export_name {
        Some(name) if is_identifier(name) => Some(serde_json::to_string(name)?),
        Some(name) => return Err(BundleError::InvalidExportName(name.clone())),
        None => None,
    };

    let mut out = String::new();
    out.push_str("(function (g) {\n");
    out.push_str("var __xjst_libs__ = {};\n");
    out.push_str("var Vow;\n");
    out.push_str(
        "var __xjst_require__ = function (name, globalName) {\n    \
         if (typeof require === 'function') { return require(name); }\n    \
         return globalName ? g[globalName] : undefined;\n\
         };\n",
    );

    for name in &options.requires {
        let key = serde_json::to_string(name)?;
        let module = serde_json::to_string(&require_path(name, &options.dirname))?;
        // Relative modules have no global fallback
        let global_name = if is_relative(name) {
            "null".to_string()
        } else {
            key.clone()
        };
        out.push_str(&format!(
            "__xjst_libs__[{}] = __xjst_require__({}, {});\n",
            key, module, global_name
        ));
    }

    if options.include_vow {
        out.push_str("Vow = __xjst_require__(\"vow\", \"vow\");\n");
    } else {
        out.push_str("Vow = g.Vow;\n");
    }

    out.push_str("var exports = {};\n");
    out.push_str("(function (exports, __xjst_libs__, Vow) {\n");
    out.push_str(compiled.as_str());
    if !compiled.as_str().ends_with('\n') {
        out.push('\n');
    }
    out.push_str("})(exports, __xjst_libs__, Vow);\n");

    match export_name {
        Some(name) => out.push_str(&format!(
            "var defineAsGlobal = true;\n\
             if (typeof module === 'object' && typeof module.exports === 'object') {{\n    \
             module.exports[{name}] = exports;\n    \
             defineAsGlobal = false;\n\
             }}\n\
             if (typeof modules === 'object' && typeof modules.define === 'function') {{\n    \
             modules.define({name}, [], function (provide) {{ provide(exports); }});\n    \
             defineAsGlobal = false;\n\
             }}\n\
             if (defineAsGlobal) {{\n    \
             g[{name}] = exports;\n\
             }}\n"
        )),
        None => out.push_str(
            "if (typeof module === 'object' && typeof module.exports === 'object') {\n    \
             module.exports = exports;\n\
             }\n",
        ),
    }
    out.push_str("})(typeof globalThis !== 'undefined' ? globalThis : this);\n");

    Ok(out)
}

/// `./x` and `../x` are module paths relative to the bundle.
fn is_relative(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../")
}

/// The string passed to `require` for a library name.
fn require_path(name: &str, dirname: &Path) -> String {
    if !is_relative(name) {
        return name.to_string();
    }

    normalize_path(&dirname.join(name))
        .to_string_lossy()
        .replace('\\', "/")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
