//! Where payloads live and which one to load.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::loader::{self, DataLoadError};

/// Base name of a data config file (`factopedia.ron`, `.toml` or `.json`).
pub const CONFIG_BASE_NAME: &str = "factopedia";

fn default_data_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_regime() -> String {
    "base".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// Selects a payload: `<data_root>/<regime>/data.json`, displayed in
/// `language`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    /// Dataset / mod-set selector.
    #[serde(default = "default_regime")]
    pub regime: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            regime: default_regime(),
            language: default_language(),
        }
    }
}

impl DataConfig {
    /// Read a config file in any supported format.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        loader::deserialize_file(path)
    }

    /// Read `factopedia.{ron,toml,json}` from `dir`, or the defaults when
    /// there is none.
    pub fn discover(dir: &Path) -> Result<Self, DataLoadError> {
        match loader::find_data_file(dir, CONFIG_BASE_NAME)? {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn payload_path(&self) -> PathBuf {
        loader::payload_path(&self.data_root, &self.regime)
    }

    /// Load the selected payload. Blocks until the whole catalog is built.
    pub fn load_catalog(&self) -> Result<Catalog, DataLoadError> {
        loader::load_catalog(&self.payload_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "factopedia_config_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults() {
        let c = DataConfig::default();
        assert_eq!(c.regime, "base");
        assert_eq!(c.language, "en");
        assert_eq!(c.payload_path(), PathBuf::from("data/base/data.json"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let dir = temp_dir("partial");
        let path = dir.join("factopedia.toml");
        fs::write(&path, "regime = \"space-age\"\n").unwrap();
        let c = DataConfig::load(&path).unwrap();
        assert_eq!(c.regime, "space-age");
        assert_eq!(c.language, "en");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = temp_dir("discover_none");
        assert_eq!(DataConfig::discover(&dir).unwrap(), DataConfig::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_reads_ron() {
        let dir = temp_dir("discover_ron");
        fs::write(dir.join("factopedia.ron"), r#"(language: "de")"#).unwrap();
        let c = DataConfig::discover(&dir).unwrap();
        assert_eq!(c.language, "de");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_catalog_from_regime_dir() {
        let dir = temp_dir("load");
        fs::create_dir_all(dir.join("base")).unwrap();
        fs::write(
            dir.join("base").join("data.json"),
            r#"{"raw": {"recipe": {}}, "mod_versions": {"base": "1.1.0"}}"#,
        )
        .unwrap();
        let c = DataConfig {
            data_root: dir.clone(),
            ..DataConfig::default()
        };
        let catalog = c.load_catalog().unwrap();
        assert_eq!(catalog.mod_versions().len(), 1);

        let missing = DataConfig {
            data_root: dir.clone(),
            regime: "nope".into(),
            ..DataConfig::default()
        };
        assert!(matches!(missing.load_catalog(), Err(DataLoadError::Io(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
