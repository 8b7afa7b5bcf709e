/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Configuration for XJST targets, compile jobs and bundling.
 */

//! Configuration types.
//!
//! [`XjstOptions`] is what users write (in YAML or through CLI flags). It is
//! split into a [`CompileConfig`], passed through to the template compiler,
//! and [`BundleOptions`], used when wrapping the compiled code into a module.
//!
//! Options that are not set stay unset all the way to the compiler, which
//! applies its own defaults. Named defaults for the common template flavors
//! are available as presets ([`XjstOptions::bemhtml`],
//! [`XjstOptions::bemtree`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target pattern used when none is configured
pub const DEFAULT_TARGET: &str = "?.xjst.js";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`XjstOptions`].
    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Options of one XJST target.
///
/// # YAML Format
///
/// ```yaml
/// target: "?.bemhtml.js"
/// dev-mode: true
/// cache: false
/// export-name: BEMHTML
/// apply-func-name: apply
/// include-vow: true
/// requires:
///   - i18n
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct XjstOptions {
    /// Target file name; `?` is replaced by the bundle directory's name
    pub target: Option<String>,
    /// Generate development-mode code
    pub dev_mode: Option<bool>,
    /// Let the compiler cache internally
    pub cache: Option<bool>,
    /// Name the bundle is exported under
    pub export_name: Option<String>,
    /// Name of the entry point function
    pub apply_func_name: Option<String>,
    /// Load the `vow` promise library inside the bundle
    pub include_vow: Option<bool>,
    /// Extra libraries made available to templates through `this.require`
    pub requires: Vec<String>,
}

impl XjstOptions {
    /// Preset for synchronous BEMHTML templates.
    pub fn bemhtml() -> Self {
        Self {
            target: Some("?.bemhtml.js".to_string()),
            export_name: Some("BEMHTML".to_string()),
            apply_func_name: Some("apply".to_string()),
            include_vow: Some(false),
            ..Default::default()
        }
    }

    /// Preset for BEMTREE templates, which return promises and need `vow`.
    pub fn bemtree() -> Self {
        Self {
            target: Some("?.bemtree.xjst.js".to_string()),
            export_name: Some("BEMTREE".to_string()),
            apply_func_name: Some("apply".to_string()),
            include_vow: Some(true),
            ..Default::default()
        }
    }

    /// Parse options from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document means "nothing configured"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load options from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `other` on top of `self`.
    ///
    /// Values set in `other` win; `requires` lists are concatenated.
    pub fn overlay(mut self, other: XjstOptions) -> Self {
        self.target = other.target.or(self.target);
        self.dev_mode = other.dev_mode.or(self.dev_mode);
        self.cache = other.cache.or(self.cache);
        self.export_name = other.export_name.or(self.export_name);
        self.apply_func_name = other.apply_func_name.or(self.apply_func_name);
        self.include_vow = other.include_vow.or(self.include_vow);
        self.requires.extend(other.requires);
        self
    }

    /// The target pattern, [`DEFAULT_TARGET`] if none is configured.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    /// The part of the options the template compiler understands.
    pub fn compile_config(&self) -> CompileConfig {
        CompileConfig {
            dev_mode: self.dev_mode,
            cache: self.cache,
            export_name: self.export_name.clone(),
            apply_func_name: self.apply_func_name.clone(),
        }
    }

    /// The part of the options the bundler understands.
    ///
    /// `dirname` is the directory the bundle is written to.
    pub fn bundle_options(&self, dirname: &Path) -> BundleOptions {
        BundleOptions {
            dirname: dirname.to_path_buf(),
            export_name: self.export_name.clone(),
            include_vow: self.include_vow.unwrap_or(false),
            requires: self.requires.clone(),
        }
    }
}

/// Options passed through to the template compiler, unchanged.
///
/// Serialized with the compiler's own option names:
/// `devMode`, `cache`, `exportName`, `applyFuncName`. Unset options are
/// left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_func_name: Option<String>,
}

/// Options for wrapping compiled code into a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Directory the bundle is written to; relative requires resolve from here
    pub dirname: PathBuf,
    /// Name the module is published under; unnamed bundles are CommonJS only
    pub export_name: Option<String>,
    pub include_vow: bool,
    pub requires: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_set_by_default() {
        let options = XjstOptions::default();
        assert_eq!(options.target(), "?.xjst.js");
        assert_eq!(options.dev_mode, None);
        assert_eq!(options.cache, None);
        assert_eq!(options.export_name, None);
        assert_eq!(options.apply_func_name, None);
        assert_eq!(options.include_vow, None);
        assert!(options.requires.is_empty());
    }

    #[test]
    fn test_unset_options_are_left_out_of_compiler_json() {
        let json = serde_json::to_value(XjstOptions::default().compile_config()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let options = XjstOptions {
            dev_mode: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(options.compile_config()).unwrap();
        assert_eq!(json, serde_json::json!({ "devMode": false }));
    }

    #[test]
    fn test_bemhtml_preset() {
        let options = XjstOptions::bemhtml();
        assert_eq!(options.target(), "?.bemhtml.js");
        assert_eq!(options.export_name.as_deref(), Some("BEMHTML"));
        assert_eq!(options.apply_func_name.as_deref(), Some("apply"));
        assert_eq!(options.include_vow, Some(false));
        assert_eq!(options.dev_mode, None);
    }

    #[test]
    fn test_bemtree_preset() {
        let options = XjstOptions::bemtree();
        assert_eq!(options.target(), "?.bemtree.xjst.js");
        assert_eq!(options.export_name.as_deref(), Some("BEMTREE"));
        assert_eq!(options.apply_func_name.as_deref(), Some("apply"));
        assert_eq!(options.include_vow, Some(true));
        assert_eq!(options.cache, None);
    }

    #[test]
    fn test_overlay_keeps_unset_values() {
        let file = XjstOptions::from_yaml_str("export-name: BEMBUSH\nrequires: [i18n]\n").unwrap();
        let options = XjstOptions::bemtree().overlay(file);

        assert_eq!(options.export_name.as_deref(), Some("BEMBUSH"));
        assert_eq!(options.target(), "?.bemtree.xjst.js");
        assert_eq!(options.include_vow, Some(true));
        assert_eq!(options.requires, vec!["i18n"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(XjstOptions::from_yaml_str("").unwrap(), XjstOptions::default());
        assert_eq!(XjstOptions::from_yaml_str("  \n").unwrap(), XjstOptions::default());
    }

    #[test]
    fn test_partial_yaml() {
        let options = XjstOptions::from_yaml_str(
            "export-name: BEMTREE\ninclude-vow: false\nrequires: [i18n, moment]\n",
        )
        .unwrap();

        assert_eq!(options.export_name.as_deref(), Some("BEMTREE"));
        assert_eq!(options.include_vow, Some(false));
        assert_eq!(options.requires, vec!["i18n", "moment"]);
        assert_eq!(options.apply_func_name, None);
        assert_eq!(options.target(), "?.xjst.js");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = XjstOptions::from_yaml_str("dev-mode: [not, a, bool]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = XjstOptions::from_yaml_file(Path::new("/nonexistent/xjst.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/xjst.yml"));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xjst.yml");
        std::fs::write(&path, "dev-mode: true\ncache: true\n").unwrap();

        let options = XjstOptions::from_yaml_file(&path).unwrap();
        assert_eq!(options.dev_mode, Some(true));
        assert_eq!(options.cache, Some(true));
    }

    #[test]
    fn test_compile_config_uses_compiler_names() {
        let options = XjstOptions {
            dev_mode: Some(true),
            ..XjstOptions::bemtree()
        };
        let json = serde_json::to_value(options.compile_config()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "devMode": true,
                "exportName": "BEMTREE",
                "applyFuncName": "apply",
            })
        );
    }

    #[test]
    fn test_bundle_options() {
        let options = XjstOptions {
            requires: vec!["i18n".to_string()],
            ..XjstOptions::bemhtml()
        };
        let bundle = options.bundle_options(Path::new("/project/bundles/index"));
        assert_eq!(bundle.dirname, PathBuf::from("/project/bundles/index"));
        assert_eq!(bundle.export_name.as_deref(), Some("BEMHTML"));
        assert!(!bundle.include_vow);
        assert_eq!(bundle.requires, vec!["i18n"]);
    }

    #[test]
    fn test_unset_vow_is_not_bundled() {
        let bundle = XjstOptions::default().bundle_options(Path::new("/b"));
        assert!(!bundle.include_vow);
        assert_eq!(bundle.export_name, None);
    }
}
