//! `CMODModule`: the on-disk directory layout for a CMOD, recursively
//! loaded/saved/validated. Grounded on `CMODSystem.cpp`'s
//! `CMODModule::Load`/`Save`/`Validate`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::StructuralError;
use crate::export::CMODExport;
use crate::info::{parse_version_triple, CMODInfo};

#[derive(Debug, Clone, Default)]
pub struct CMODModule {
    pub info: CMODInfo,
    pub export: CMODExport,
    /// Keyed by path relative to the module root (`src/...`).
    pub source_files: BTreeMap<String, String>,
    pub sub_modules: Vec<CMODModule>,
    pub structure_errors: Vec<String>,
}

impl CMODModule {
    /// Load a module from a directory, recursing into any sub-modules
    /// found under `src/`.
    pub fn load(dir: &Path) -> Result<Self, StructuralError> {
        let name = dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();

        let src_dir = dir.join("src");
        let info_dir = dir.join("info");
        if !src_dir.is_dir() {
            return Err(StructuralError::MissingSrc(name));
        }
        if !info_dir.is_dir() {
            return Err(StructuralError::MissingInfo(name));
        }

        let info_path = info_dir.join(format!("{name}.chtl"));
        let info_source = fs::read_to_string(&info_path)
            .map_err(|e| StructuralError::MalformedInfo(format!("{}: {e}", info_path.display())))?;
        let info = CMODInfo::parse(&info_source)?;
        let mut export = CMODExport::parse(&info_source);

        let mut source_files = BTreeMap::new();
        let mut sub_modules = Vec::new();
        collect_src(&src_dir, &src_dir, &mut source_files, &mut sub_modules)?;

        if export.is_empty() {
            export.auto_generate(source_files.values());
        }

        Ok(CMODModule { info, export, source_files, sub_modules, structure_errors: Vec::new() })
    }

    /// Write the mirror of `load`: an `[Info]` block in canonical order,
    /// an auto-generated `[Export]` block, then every source file.
    pub fn save(&self, dir: &Path) -> std::io::Result<()> {
        let info_dir = dir.join("info");
        let src_dir = dir.join("src");
        fs::create_dir_all(&info_dir)?;
        fs::create_dir_all(&src_dir)?;

        let mut contents = self.info.serialize();
        contents.push('\n');
        contents.push_str(&self.export.serialize());
        fs::write(info_dir.join(format!("{}.chtl", self.info.name)), contents)?;

        for (relative, text) in &self.source_files {
            let target = src_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, text)?;
        }

        for sub in &self.sub_modules {
            sub.save(&src_dir.join(&sub.info.name))?;
        }
        Ok(())
    }

    /// Validate structural invariants: name agreement, version well-
    /// formedness, and main-source presence when leaf.
    pub fn validate(&self, folder_name: &str) -> Result<(), StructuralError> {
        if self.info.name.is_empty() {
            return Err(StructuralError::MissingRequiredField("name".to_string()));
        }
        if self.info.name != folder_name {
            return Err(StructuralError::NameMismatch {
                expected: folder_name.to_string(),
                actual: self.info.name.clone(),
                context: "folder name".to_string(),
            });
        }

        if self.info.version.is_empty() {
            return Err(StructuralError::MissingRequiredField("version".to_string()));
        }

        for (label, version) in [("minCHTLVersion", &self.info.min_chtl_version), ("maxCHTLVersion", &self.info.max_chtl_version)]
        {
            if version.is_empty() || parse_version_triple(version).is_none() {
                return Err(StructuralError::MalformedInfo(format!("{label} is not a well-formed x.y.z version: {version:?}")));
            }
        }

        if self.sub_modules.is_empty() {
            let main_source = format!("{}.chtl", self.info.name);
            if !self.source_files.contains_key(&main_source) {
                return Err(StructuralError::MissingMainSource(self.info.name.clone()));
            }
        }

        Ok(())
    }
}

/// Walk `dir` (the module's `src/`) collecting regular files, but stop
/// descending as soon as a subdirectory is itself a valid module root
/// (has both `src/` and `info/`) — that subtree is loaded recursively as
/// a sub-module instead of flattened into `source_files`.
fn collect_src(
    root: &Path,
    dir: &Path,
    source_files: &mut BTreeMap<String, String>,
    sub_modules: &mut Vec<CMODModule>,
) -> Result<(), StructuralError> {
    let mut walker = WalkDir::new(dir).min_depth(1).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| StructuralError::MalformedInfo(e.to_string()))?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            if path.join("src").is_dir() && path.join("info").is_dir() {
                sub_modules.push(CMODModule::load(path)?);
                walker.skip_current_dir();
            }
            continue;
        }

        if let Ok(text) = fs::read_to_string(path) {
            let relative = path.strip_prefix(root).unwrap_or(path).to_string_lossy().replace('\\', "/");
            source_files.insert(relative, text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_round_trips_a_minimal_module() {
        let tmp = tempfile::tempdir().unwrap();
        let module_dir = tmp.path().join("Box");
        fs::create_dir_all(module_dir.join("info")).unwrap();
        fs::create_dir_all(module_dir.join("src")).unwrap();

        fs::write(
            module_dir.join("info/Box.chtl"),
            r#"[Info] { name = "Box"; version = "1.0.0"; author = "a"; minCHTLVersion = "1.0.0"; maxCHTLVersion = "2.0.0"; }"#,
        )
        .unwrap();
        fs::write(module_dir.join("src/Box.chtl"), "[Custom] @Style Box { }").unwrap();

        let module = CMODModule::load(&module_dir).unwrap();
        assert_eq!(module.info.name, "Box");
        assert!(module.source_files.contains_key("Box.chtl"));
        assert!(module.validate("Box").is_ok());
    }

    #[test]
    fn missing_src_directory_is_a_structural_error() {
        let tmp = tempfile::tempdir().unwrap();
        let module_dir = tmp.path().join("Empty");
        fs::create_dir_all(&module_dir).unwrap();
        assert!(CMODModule::load(&module_dir).is_err());
    }
}
