//! CMOD Manager: search paths, a name-keyed load cache, and recursive
//! dependency-closure resolution with cycle detection.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::archive::unpack;
use crate::error::CmodError;
use crate::module::CMODModule;

#[derive(Debug)]
pub struct CMODManager {
    search_paths: Vec<PathBuf>,
    cache: HashMap<String, CMODModule>,
}

impl Default for CMODManager {
    fn default() -> Self {
        Self { search_paths: vec![PathBuf::from("./module/"), PathBuf::from("./")], cache: HashMap::new() }
    }
}

impl CMODManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths, cache: HashMap::new() }
    }

    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CMODModule> {
        self.cache.get(name)
    }

    pub fn unload(&mut self, name: &str) {
        self.cache.remove(name);
    }

    /// Load `name`, walking search paths for either a directory
    /// containing `src/`+`info/` or a `.cmod` archive file, then resolve
    /// its dependency closure recursively.
    pub fn load(&mut self, name: &str) -> Result<(), CmodError> {
        let mut visiting = Vec::new();
        self.load_with_trail(name, &mut visiting)
    }

    fn load_with_trail(&mut self, name: &str, visiting: &mut Vec<String>) -> Result<(), CmodError> {
        if self.cache.contains_key(name) {
            return Ok(());
        }

        if visiting.contains(&name.to_string()) {
            let mut cycle = visiting.clone();
            cycle.push(name.to_string());
            return Err(CmodError::DependencyCycle(cycle));
        }
        visiting.push(name.to_string());

        let module = self.locate_and_load(name)?;
        let dependencies = module.info.dependencies.clone();
        self.cache.insert(name.to_string(), module);

        for dependency in dependencies {
            self.load_with_trail(&dependency, visiting)?;
        }

        visiting.pop();
        Ok(())
    }

    fn locate_and_load(&self, name: &str) -> Result<CMODModule, CmodError> {
        for root in &self.search_paths {
            let dir_candidate = root.join(name);
            if dir_candidate.is_dir() && dir_candidate.join("src").is_dir() && dir_candidate.join("info").is_dir() {
                return Ok(CMODModule::load(&dir_candidate)?);
            }

            let archive_candidate = root.join(format!("{name}.cmod"));
            if archive_candidate.is_file() {
                return Ok(load_archive(&archive_candidate)?);
            }
        }
        Err(CmodError::NotFound(name.to_string()))
    }
}

fn load_archive(path: &Path) -> Result<CMODModule, CmodError> {
    let mut file = File::open(path)?;
    Ok(unpack(&mut file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn fails_when_module_is_in_no_search_path() {
        let mut manager = CMODManager::with_search_paths(vec![PathBuf::from("/nonexistent")]);
        assert!(manager.load("Box").is_err());
    }

    #[test]
    fn loads_a_directory_module_and_caches_it() {
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

        let mut manager = CMODManager::with_search_paths(vec![tmp.path().to_path_buf()]);
        manager.load("Box").unwrap();
        assert!(manager.is_cached("Box"));
    }
}
