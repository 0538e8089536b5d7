//! Inspection tool for CODEBRIM manifests and image caches.
//!
//! Builds the dataset adapter exactly as a training loop would and reports:
//! - number of retained samples
//! - per-class positive counts
//! - shape and label of one sample

use std::path::PathBuf;

use anyhow::{Context, Result};
use bikit_core::{load_toml_config, setup_cli_logging, DatasetOptions, Split, CLASS_NAMES};
use bikit_dataset::CodebrimDataset;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "bikit-inspect")]
#[command(about = "Inspect a CODEBRIM dataset split", long_about = None)]
struct Cli {
    /// TOML file with dataset options; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset name from the registry
    #[arg(short, long)]
    name: Option<String>,

    /// Split to keep: train, valid or test
    #[arg(short, long)]
    split: Option<Split>,

    /// Cache directory holding `<name>/<img_path>`
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory with datasets.json and the CSV manifests
    #[arg(long)]
    registry_root: Option<PathBuf>,

    /// Decode every image before inspecting
    #[arg(long)]
    load_all_in_mem: bool,

    /// Keep only the first 100 rows
    #[arg(long)]
    devel_mode: bool,

    /// Sample to print
    #[arg(short, long, default_value = "0")]
    index: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Result<DatasetOptions> {
        let mut options = match &self.config {
            Some(path) => load_toml_config::<DatasetOptions>(path)?,
            None => DatasetOptions::default(),
        };

        if let Some(name) = &self.name {
            options.name = name.clone();
        }
        if self.split.is_some() {
            options.split = self.split;
        }
        if let Some(dir) = &self.cache_dir {
            options.cache_dir = Some(dir.clone());
        }
        if let Some(root) = &self.registry_root {
            options.registry_root = Some(root.clone());
        }
        options.load_all_in_mem |= self.load_all_in_mem;
        options.devel_mode |= self.devel_mode;

        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_cli_logging(cli.verbose)?;

    let options = cli.options()?;
    let name = options.name.clone();
    let dataset = CodebrimDataset::from_options(options)
        .build()
        .with_context(|| format!("Failed to load dataset '{name}'"))?;

    info!("Dataset: {}", dataset.name());
    info!("Cache directory: {}", dataset.cache_dir().display());
    info!("Samples: {}", dataset.manifest().len());

    let stats = dataset.statistics();
    for (class, count) in CLASS_NAMES.iter().zip(stats.class_counts) {
        info!("  {:<15} {}", class, count);
    }
    info!("Multi-label samples: {}", stats.multi_label_samples);

    if dataset.manifest().is_empty() {
        info!("Nothing to sample");
        return Ok(());
    }

    let item = dataset
        .try_get(cli.index)
        .with_context(|| format!("Failed to read sample {}", cli.index))?;
    info!(
        "Sample {} ({}): image {:?}, label {:?}",
        cli.index, item.img_name, item.image.shape, item.label
    );

    Ok(())
}
