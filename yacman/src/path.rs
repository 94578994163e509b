//! Path normalization for backing files and schema sources.
//!
//! A configuration object always remembers its file as an absolute path so
//! that the derived lock sentinel is the same no matter which working
//! directory later operations run from.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::expand::expand_str;

/// Resolve `.` and `..` components in a path without touching the
/// filesystem.
///
/// `..` at the root stays at the root, matching POSIX `/..` semantics.
///
/// # Examples
///
/// ```
/// use yacman::path::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(resolve_components(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
/// assert_eq!(resolve_components(Path::new("/a/../..")), PathBuf::from("/"));
/// ```
#[must_use]
pub fn resolve_components(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                result.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() && !result.has_root() {
                    result.push(component);
                }
            }
        }
    }

    result
}

/// Make `path` absolute.
///
/// This function:
/// 1. Expands `~` and environment variables (UTF-8 paths only; other
///    paths are used as given)
/// 2. Joins relative paths onto the current directory
/// 3. Resolves `.` and `..` components
///
/// Symlinks are not followed and the path need not exist.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
///
/// # Examples
///
/// ```
/// use yacman::path::absolutize;
/// use std::path::Path;
///
/// let path = absolutize(Path::new("configs/../conf.yaml")).unwrap();
/// assert!(path.is_absolute());
/// assert!(path.ends_with("conf.yaml"));
/// ```
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let expanded = match path.to_str() {
        Some(text) => PathBuf::from(expand_str(text)),
        None => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = env::current_dir().map_err(|e| Error::io(path, e))?;
        cwd.join(expanded)
    };

    Ok(resolve_components(&absolute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_components_simple() {
        assert_eq!(
            resolve_components(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_resolve_components_multiple_parent() {
        assert_eq!(
            resolve_components(Path::new("/a/b/../../c")),
            PathBuf::from("/c")
        );
    }

    #[test]
    fn test_resolve_components_root_only() {
        assert_eq!(resolve_components(Path::new("/")), PathBuf::from("/"));
    }

    #[test]
    fn test_resolve_components_relative_leading_parent() {
        assert_eq!(
            resolve_components(Path::new("../a")),
            PathBuf::from("../a")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_absolutize_absolute() {
        let path = absolutize(Path::new("/a/./b/../c.yaml")).unwrap();
        assert_eq!(path, PathBuf::from("/a/c.yaml"));
    }

    #[test]
    #[cfg(unix)]
    fn test_absolutize_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = Path::new(OsStr::from_bytes(b"/tmp/conf-\xff/./c.yaml"));
        let path = absolutize(raw).unwrap();
        assert_eq!(path, PathBuf::from(OsStr::from_bytes(b"/tmp/conf-\xff/c.yaml")));
    }

    #[test]
    fn test_absolutize_relative() {
        let cwd = env::current_dir().unwrap();
        let path = absolutize(Path::new("relative/conf.yaml")).unwrap();
        assert!(path.is_absolute());
        assert!(path.starts_with(&cwd));
        assert!(path.ends_with("relative/conf.yaml"));
    }

    #[test]
    fn test_absolutize_tilde() {
        let home = home::home_dir().unwrap();
        let path = absolutize(Path::new("~/conf.yaml")).unwrap();
        assert_eq!(path, home.join("conf.yaml"));
    }
}
