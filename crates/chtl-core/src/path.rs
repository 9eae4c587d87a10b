//! Lexical path canonicalization.
//!
//! Mirrors `ImportManager::NormalizePath` from the CHTL import resolver:
//! paths are normalized without touching the filesystem, so an import
//! target that does not exist yet can still be assigned a stable identity
//! key during dependency analysis.

use std::path::{Component, Path, PathBuf};

/// Turn an arbitrary path into its canonical identity key.
///
/// Relative paths resolve against the current working directory. `.` and
/// `..` segments collapse lexically and separators normalize to `/`. The
/// filesystem is never consulted, so the result is defined for paths that
/// don't exist yet.
pub fn canonicalize(p: &str) -> String {
    let path = Path::new(p);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")).join(path)
    };
    lexical_normalize(&absolute)
}

fn lexical_normalize(path: &Path) -> String {
    let mut stack: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                stack.push(prefix.as_os_str().to_string_lossy().into_owned());
            }
            Component::RootDir => {}
            Component::CurDir => {}
            Component::ParentDir => {
                if stack.last().map(String::as_str).is_some_and(|s| s != "..") {
                    stack.pop();
                } else {
                    stack.push("..".to_string());
                }
            }
            Component::Normal(segment) => {
                stack.push(segment.to_string_lossy().into_owned());
            }
        }
    }
    format!("/{}", stack.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_for_arbitrary_paths() {
        let once = canonicalize("./a/../a/x");
        let twice = canonicalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn dot_dot_variants_resolve_equal() {
        let base = std::env::current_dir().unwrap();
        let a = base.join("a/x");
        let b = base.join("./a/../a/x");
        assert_eq!(canonicalize(a.to_str().unwrap()), canonicalize(b.to_str().unwrap()));
    }

    #[test]
    fn absolute_paths_normalize_separators() {
        assert_eq!(canonicalize("/a/b/../c"), "/a/c");
        assert_eq!(canonicalize("/a/./b"), "/a/b");
    }

    #[test]
    fn leading_parent_dir_is_kept_literally() {
        assert_eq!(canonicalize("/../a"), "/../a");
    }
}
