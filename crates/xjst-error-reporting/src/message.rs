//! Message and path formatting helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// The compiler appends its own position (in merged-unit coordinates) to
/// messages as `" at: <line>:<column>"`.
static MERGED_POSITION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\sat:\s\d+:\d+\s*$").expect("valid position suffix regex"));

/// Reduce a compiler message to the part worth showing next to a source
/// excerpt.
///
/// Keeps the first line only and drops a trailing `" at: L:C"` annotation,
/// since that position refers to the merged unit rather than the user's
/// file. Messages without a newline or without the annotation are kept as
/// they are.
///
/// # Example
///
/// ```
/// use xjst_error_reporting::clean_message;
///
/// assert_eq!(clean_message("Unexpected token at: 12:4\n  stack..."), "Unexpected token");
/// assert_eq!(clean_message("Unexpected token"), "Unexpected token");
/// ```
pub fn clean_message(raw: &str) -> String {
    let first_line = raw.split('\n').next().unwrap_or_default();
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);
    MERGED_POSITION_SUFFIX.replace(first_line, "").into_owned()
}

/// Remove `.` and resolve `..` lexically, without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped; leading `..` of a
/// relative path is kept.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use xjst_error_reporting::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
/// assert_eq!(normalize_path(Path::new("../x/../y")), PathBuf::from("../y"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components.iter().map(|c| c.as_os_str()).collect()
}

/// Compute `target` relative to `root` without touching the filesystem.
///
/// Both paths are normalized with [`normalize_path`] first. When one is
/// absolute and the other is not, or when a relative `root` climbs out
/// through `..` past the common prefix, no relative form can be computed
/// and `target` is returned unchanged. Callers that want a relative form in
/// every case pass absolute paths.
pub fn relative_path(root: &Path, target: &Path) -> PathBuf {
    if root.is_absolute() != target.is_absolute() {
        return target.to_path_buf();
    }
    let root = normalize_path(root);
    let target_normalized = normalize_path(target);

    let mut target_components = target_normalized.components();
    let mut root_components = root.components();
    let mut result: Vec<Component<'_>> = Vec::new();

    loop {
        match (target_components.next(), root_components.next()) {
            (None, None) => break,
            (Some(t), None) => {
                result.push(t);
                result.extend(target_components.by_ref());
                break;
            }
            (None, Some(_)) => result.push(Component::ParentDir),
            (Some(t), Some(r)) if result.is_empty() && t == r => {}
            (Some(t), Some(Component::CurDir)) => result.push(t),
            (Some(_), Some(Component::ParentDir)) => return target.to_path_buf(),
            (Some(t), Some(_)) => {
                result.push(Component::ParentDir);
                for _ in root_components.by_ref() {
                    result.push(Component::ParentDir);
                }
                result.push(t);
                result.extend(target_components.by_ref());
                break;
            }
        }
    }

    result.iter().map(|c| c.as_os_str()).collect()
}

/// Path of a source file as shown in error messages.
///
/// The path is relative to `root` and always starts with `.`: a `./` prefix
/// is added unless the relative path already begins with `.` (as `../x`
/// does).
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use xjst_error_reporting::display_path;
///
/// let root = Path::new("/project");
/// assert_eq!(display_path(root, Path::new("/project/blocks/b.xjst")), "./blocks/b.xjst");
/// assert_eq!(display_path(root, Path::new("/libs/i-bem.xjst")), "../libs/i-bem.xjst");
/// ```
pub fn display_path(root: &Path, target: &Path) -> String {
    let relative = relative_path(root, target);
    let relative = relative.to_string_lossy();

    if relative.starts_with('.') {
        relative.into_owned()
    } else {
        format!("./{relative}")
    }
}
