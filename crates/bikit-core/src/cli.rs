//! Shared CLI helpers for workspace tools.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{Error, Result};

/// Install a `tracing` subscriber; `RUST_LOG` overrides the level.
pub fn setup_cli_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}

pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatasetOptions, Split};
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.toml");
        fs::write(&path, "name = \"codebrim-classif-balanced\"\nsplit = \"test\"\ndevel_mode = true\n")
            .unwrap();

        let options: DatasetOptions = load_toml_config(&path).unwrap();
        assert_eq!(options.split, Some(Split::Test));
        assert!(options.devel_mode);
    }

    #[test]
    fn test_load_toml_config_missing_file() {
        let result: Result<DatasetOptions> = load_toml_config(Path::new("/nonexistent/bikit.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_toml_config_bad_split() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.toml");
        fs::write(&path, "split = \"holdout\"\n").unwrap();

        let result: Result<DatasetOptions> = load_toml_config(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
