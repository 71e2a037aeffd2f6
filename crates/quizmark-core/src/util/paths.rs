//! Lexical path helpers.
//!
//! Documents are identified by their path relative to the corpus root.
//! Link resolution works on those relative paths without touching the
//! filesystem, so everything here is purely lexical.

use std::path::{Component, Path, PathBuf};

/// Render a path with forward slashes regardless of platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quizmark_core::util::paths::display_path;
///
/// assert_eq!(display_path(Path::new("part-1/intro.md")), "part-1/intro.md");
/// ```
pub fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::RootDir | Component::Prefix(_) | Component::CurDir => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip `root` from `path`, falling back to `path` itself.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Join a relative `target` onto `base_dir` and normalize `.`/`..`.
///
/// Returns `None` when the result would climb above the root that
/// `base_dir` is relative to, or when `target` is absolute.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use quizmark_core::util::paths::resolve_relative;
///
/// assert_eq!(
///     resolve_relative(Path::new("part-1"), "../part-2/loops.md"),
///     Some(PathBuf::from("part-2/loops.md"))
/// );
/// assert_eq!(resolve_relative(Path::new(""), "../outside.md"), None);
/// ```
pub fn resolve_relative(base_dir: &Path, target: &str) -> Option<PathBuf> {
    let target = Path::new(target);
    if target.has_root() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for component in base_dir.components().chain(target.components()) {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(parts.iter().collect())
}
