//! Optional `chtl.toml` project configuration. Grounded on
//! `dx-cli/src/config.rs`'s `ProjectConfig` (serde structs with
//! per-field defaults, loaded only when present).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectInfo,

    #[serde(default)]
    pub module: ModuleConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self { name: default_name(), version: default_version() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub search_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { output: default_output() }
    }
}

fn default_name() -> String {
    "untitled".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_output() -> String {
    "output.html".to_string()
}

impl ProjectConfig {
    /// Load `chtl.toml` from `dir` if it exists; absence is not an
    /// error, since the config file is entirely optional.
    pub fn load_optional(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join("chtl.toml");
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let config: ProjectConfig = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ProjectConfig::load_optional(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn parses_partial_config_with_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("chtl.toml"), "[project]\nname = \"Demo\"\n").unwrap();
        let config = ProjectConfig::load_optional(tmp.path()).unwrap().unwrap();
        assert_eq!(config.project.name, "Demo");
        assert_eq!(config.build.output, "output.html");
    }
}
