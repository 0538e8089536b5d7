//! Configuration structures for the dataset adapters.

use crate::types::Split;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dataset loaded when no name is given.
pub const DEFAULT_DATASET: &str = "codebrim-classif-balanced";

/// Number of rows kept in development mode.
pub const DEVEL_MODE_LIMIT: usize = 100;

/// Directory under the home directory used as the default image cache.
pub const DEFAULT_CACHE_SUBDIR: &str = ".bikit";

/// Registry file name inside the registry root.
pub const REGISTRY_FILE: &str = "datasets.json";

/// Registry root shipped with the workspace (`data/`).
pub fn default_registry_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Options for constructing a dataset adapter.
///
/// Everything except the transform, which is code rather than data, can be
/// read from a TOML file:
///
/// ```toml
/// name = "codebrim-classif-balanced"
/// split = "train"
/// cache_dir = "/data/bikit"
/// load_all_in_mem = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetOptions {
    /// Registry key of the dataset
    pub name: String,
    /// Keep only rows of this split; all rows when `None`
    pub split: Option<Split>,
    /// Cache directory override; images live in `<cache_dir>/<name>`
    pub cache_dir: Option<PathBuf>,
    /// Directory holding `datasets.json` and the per-dataset CSV manifests
    pub registry_root: Option<PathBuf>,
    /// Decode every image at construction time
    pub load_all_in_mem: bool,
    /// Keep only the first 100 rows after split filtering
    pub devel_mode: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATASET.to_string(),
            split: None,
            cache_dir: None,
            registry_root: None,
            load_all_in_mem: false,
            devel_mode: false,
        }
    }
}

impl DatasetOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Directory the manifest's relative image paths resolve against.
    ///
    /// `<cache_dir>/<name>` with an override, `~/.bikit/<name>` otherwise.
    pub fn cache_full_dir(&self) -> Result<PathBuf> {
        let base = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
                .join(DEFAULT_CACHE_SUBDIR),
        };
        Ok(base.join(&self.name))
    }

    pub fn registry_root(&self) -> PathBuf {
        self.registry_root
            .clone()
            .unwrap_or_else(default_registry_root)
    }

    /// Row cap implied by development mode.
    pub fn row_limit(&self) -> Option<usize> {
        self.devel_mode.then_some(DEVEL_MODE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DatasetOptions::default();
        assert_eq!(options.name, DEFAULT_DATASET);
        assert_eq!(options.split, None);
        assert!(!options.load_all_in_mem);
        assert_eq!(options.row_limit(), None);
    }

    #[test]
    fn test_cache_dir_override() {
        let options = DatasetOptions {
            cache_dir: Some(PathBuf::from("/data/cache")),
            ..DatasetOptions::new("codebrim-classif-balanced")
        };
        assert_eq!(
            options.cache_full_dir().unwrap(),
            PathBuf::from("/data/cache/codebrim-classif-balanced")
        );
    }

    #[test]
    fn test_default_cache_dir_under_home() {
        let options = DatasetOptions::new("codebrim-classif-balanced");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                options.cache_full_dir().unwrap(),
                home.join(".bikit").join("codebrim-classif-balanced")
            );
        }
    }

    #[test]
    fn test_devel_mode_limit() {
        let options = DatasetOptions {
            devel_mode: true,
            ..DatasetOptions::default()
        };
        assert_eq!(options.row_limit(), Some(100));
    }

    #[test]
    fn test_from_toml() {
        let options: DatasetOptions = toml::from_str(
            r#"
            name = "codebrim-classif-balanced"
            split = "valid"
            load_all_in_mem = true
            "#,
        )
        .unwrap();
        assert_eq!(options.split, Some(Split::Valid));
        assert!(options.load_all_in_mem);
        assert!(!options.devel_mode);
        assert_eq!(options.cache_dir, None);
    }
}
