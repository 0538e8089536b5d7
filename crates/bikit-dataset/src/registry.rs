//! Dataset registry backed by `datasets.json`.
//!
//! The registry maps dataset names to descriptors. The adapter only checks
//! that a name exists and derives the manifest location from it; descriptor
//! contents (download URLs, checksums) belong to the downloader.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bikit_core::{Error, Result, REGISTRY_FILE};
use tracing::debug;

/// Known datasets and the directory holding their manifests.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    root: PathBuf,
    datasets: BTreeMap<String, serde_json::Value>,
}

impl DatasetRegistry {
    /// Reads `<root>/datasets.json`.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let path = root.join(REGISTRY_FILE);
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Dataset registry not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let registry = Self::from_json(root, &content)?;
        debug!(
            "Loaded registry {} with {} datasets",
            path.display(),
            registry.datasets.len()
        );
        Ok(registry)
    }

    /// Parses a registry document; `root` is where the manifests live.
    pub fn from_json(root: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let datasets: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;
        Ok(Self {
            root: root.into(),
            datasets,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&serde_json::Value> {
        self.datasets.get(name)
    }

    /// Fails with [`Error::NameNotFound`] for unregistered names.
    pub fn ensure(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(Error::NameNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
        }
    }

    /// `<root>/<name>.csv` for a registered dataset.
    pub fn manifest_path(&self, name: &str) -> Result<PathBuf> {
        self.ensure(name)?;
        Ok(self.root.join(format!("{name}.csv")))
    }
}
