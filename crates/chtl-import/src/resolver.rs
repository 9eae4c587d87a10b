//! Per-kind import resolution. Grounded on `ImportResolver.cpp`'s
//! `ResolveImport` dispatch and its `ResolveHtmlStyleJS`/`ResolveChtl`/
//! `ResolveCJmod`/`ResolveCustomOrTemplate` helpers.

use std::path::{Path, PathBuf};

use crate::declaration::{ImportDeclaration, ImportKind};
use crate::error::ResolutionError;

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub compiler_module_path: Option<PathBuf>,
}

/// Outcome of a resolution attempt. `import_all` resolutions carry a
/// directory rather than a single file; enumeration is left to the
/// caller.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub path: String,
    pub import_all: bool,
}

pub fn resolve(decl: &ImportDeclaration, config: &ResolverConfig) -> Result<Vec<Resolved>, ResolutionError> {
    if decl.kind.is_plain_web_asset() {
        return resolve_web_asset(decl);
    }
    if decl.kind == ImportKind::Chtl || decl.kind.delegates_to_chtl() {
        return resolve_chtl(decl, config, &["cmod", "chtl"]);
    }
    if decl.kind == ImportKind::CJmod {
        return resolve_chtl(decl, config, &["cjmod"]);
    }
    unreachable!("exhaustive over ImportKind variants")
}

fn resolve_web_asset(decl: &ImportDeclaration) -> Result<Vec<Resolved>, ResolutionError> {
    if decl.alias.is_none() {
        return Ok(Vec::new());
    }

    let current_dir = Path::new(&decl.source_file).parent().unwrap_or_else(|| Path::new("."));
    let candidate = current_dir.join(&decl.path);
    let extensions: &[&str] = match decl.kind {
        ImportKind::Html => &["html", "htm"],
        ImportKind::Style => &["css"],
        ImportKind::JavaScript => &["js"],
        _ => unreachable!(),
    };

    let mut searched = Vec::new();
    if candidate.extension().is_some() {
        searched.push(candidate.clone());
        if candidate.is_dir() {
            return Err(ResolutionError::IsADirectory { path: candidate });
        }
        return Ok(vec![Resolved { path: chtl_core::canonicalize(&candidate.to_string_lossy()), import_all: false }]);
    }

    for ext in extensions {
        let probe = candidate.with_extension(ext);
        searched.push(probe.clone());
        if probe.exists() {
            if probe.is_dir() {
                return Err(ResolutionError::IsADirectory { path: probe });
            }
            return Ok(vec![Resolved { path: chtl_core::canonicalize(&probe.to_string_lossy()), import_all: false }]);
        }
    }

    Err(ResolutionError::NotFound { path: decl.path.clone(), current_file: PathBuf::from(&decl.source_file), searched })
}

fn resolve_chtl(
    decl: &ImportDeclaration,
    config: &ResolverConfig,
    extension_order: &[&str],
) -> Result<Vec<Resolved>, ResolutionError> {
    let current_dir = Path::new(&decl.source_file).parent().unwrap_or_else(|| Path::new("."));

    let (dotted, import_all) = strip_wildcard(&decl.path);
    let relative = dotted.replace('.', "/");

    let search_roots: Vec<PathBuf> = [
        config.compiler_module_path.clone(),
        Some(current_dir.join("module")),
        Some(current_dir.to_path_buf()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut searched = Vec::new();

    for root in &search_roots {
        let base = root.join(&relative);

        if import_all {
            searched.push(base.clone());
            if base.is_dir() {
                return Ok(vec![Resolved { path: chtl_core::canonicalize(&base.to_string_lossy()), import_all: true }]);
            }
            continue;
        }

        if base.extension().is_some() {
            searched.push(base.clone());
            if base.is_file() {
                return Ok(vec![Resolved { path: chtl_core::canonicalize(&base.to_string_lossy()), import_all: false }]);
            }
            continue;
        }

        for ext in extension_order {
            let probe = base.with_extension(ext);
            searched.push(probe.clone());
            if probe.exists() {
                return Ok(vec![Resolved { path: chtl_core::canonicalize(&probe.to_string_lossy()), import_all: false }]);
            }
        }
    }

    Err(ResolutionError::NotFound { path: decl.path.clone(), current_file: PathBuf::from(&decl.source_file), searched })
}

fn strip_wildcard(path: &str) -> (String, bool) {
    if let Some(stripped) = path.strip_suffix("/*") {
        (stripped.to_string(), true)
    } else if let Some(stripped) = path.strip_suffix(".*") {
        (stripped.to_string(), true)
    } else {
        (path.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaliased_web_asset_resolves_with_no_effect() {
        let decl = ImportDeclaration::new(ImportKind::Html, "partial", "main.chtl", 1, 1);
        let config = ResolverConfig { compiler_module_path: None };
        let resolved = resolve(&decl, &config).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn dotted_chtl_path_translates_to_nested_directories() {
        let (relative, wildcard) = strip_wildcard("A.B.C");
        assert_eq!(relative.replace('.', "/"), "A/B/C");
        assert!(!wildcard);
    }

    #[test]
    fn wildcard_suffix_marks_import_all() {
        let (relative, wildcard) = strip_wildcard("A.*");
        assert_eq!(relative, "A");
        assert!(wildcard);

        let (relative, wildcard) = strip_wildcard("A/*");
        assert_eq!(relative, "A");
        assert!(wildcard);
    }
}
