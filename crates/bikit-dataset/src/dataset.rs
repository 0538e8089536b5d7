//! CODEBRIM dataset adapter.
//!
//! [`CodebrimDataset`] reads a CSV manifest once, filters it by split and
//! optionally truncates it for development runs. Images are either decoded on
//! every access or decoded once at construction and kept resident.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bikit_core::{DatasetOptions, Error, Result, Split, CLASS_NAMES, NUM_CLASSES};
use burn::data::dataset::Dataset;
use burn::prelude::*;
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::loader::ImageLoader;
use crate::manifest::{Manifest, ManifestRecord};
use crate::registry::DatasetRegistry;
use crate::statistics::DatasetStatistics;
use crate::transform::{ImageTensor, ImageTransform, ToTensor};

/// A single CODEBRIM sample.
#[derive(Clone, Debug, PartialEq)]
pub struct CodebrimItem {
    /// Transformed image, CHW
    pub image: ImageTensor,
    /// Multi-hot label in [`CLASS_NAMES`] order
    pub label: [f32; NUM_CLASSES],
    pub img_name: String,
}

impl CodebrimItem {
    /// Image tensor `[C, H, W]` and label tensor `[6]`.
    pub fn to_tensors<B: Backend>(&self, device: &B::Device) -> (Tensor<B, 3>, Tensor<B, 1>) {
        let image = self.image.to_tensor(device);
        let label = Tensor::from_floats(TensorData::new(self.label.to_vec(), [NUM_CLASSES]), device);
        (image, label)
    }
}

/// Where images come from on access.
enum ImageStore {
    /// Decode from the cache directory on every access
    Lazy(ImageLoader),
    /// Decoded at construction, keyed by image name
    Resident(HashMap<String, DynamicImage>),
}

impl ImageStore {
    fn resident(manifest: &Manifest, loader: &ImageLoader) -> Result<Self> {
        let progress = ProgressBar::new(manifest.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Load images in memory [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .map_err(|e| Error::Config(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );

        let mut images = HashMap::with_capacity(manifest.len());
        for record in manifest.iter() {
            if !images.contains_key(&record.img_name) {
                let image = loader.load_record(record)?;
                images.insert(record.img_name.clone(), image);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(ImageStore::Resident(images))
    }

    fn image(&self, record: &ManifestRecord) -> Result<DynamicImage> {
        match self {
            ImageStore::Lazy(loader) => loader.load_record(record),
            ImageStore::Resident(images) => images.get(&record.img_name).cloned().ok_or_else(|| {
                Error::NotFound(format!("Image '{}' is not resident", record.img_name))
            }),
        }
    }
}

/// Builder for [`CodebrimDataset`].
pub struct CodebrimDatasetBuilder {
    options: DatasetOptions,
    transform: Option<Box<dyn ImageTransform>>,
}

impl CodebrimDatasetBuilder {
    pub fn new(options: DatasetOptions) -> Self {
        Self {
            options,
            transform: None,
        }
    }

    /// Keep only rows of this split.
    pub fn split(mut self, split: impl Into<Option<Split>>) -> Self {
        self.options.split = split.into();
        self
    }

    /// Images are read from `<cache_dir>/<name>` instead of `~/.bikit/<name>`.
    pub fn cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.options.cache_dir = Some(cache_dir.into());
        self
    }

    /// Directory holding `datasets.json` and the manifests.
    pub fn registry_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.registry_root = Some(root.into());
        self
    }

    pub fn transform(mut self, transform: impl ImageTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Decode all images up front.
    pub fn load_all_in_mem(mut self, yes: bool) -> Self {
        self.options.load_all_in_mem = yes;
        self
    }

    /// Keep only the first 100 rows.
    pub fn devel_mode(mut self, yes: bool) -> Self {
        self.options.devel_mode = yes;
        self
    }

    pub fn build(self) -> Result<CodebrimDataset> {
        CodebrimDataset::new(self.options, self.transform)
    }
}

/// CODEBRIM dataset implementing Burn's Dataset trait.
///
/// Immutable once built, so a single instance can be shared between
/// data-loader workers.
pub struct CodebrimDataset {
    name: String,
    split: Option<Split>,
    cache_dir: PathBuf,
    manifest: Manifest,
    store: ImageStore,
    transform: Box<dyn ImageTransform>,
}

impl CodebrimDataset {
    pub fn builder(name: impl Into<String>) -> CodebrimDatasetBuilder {
        CodebrimDatasetBuilder::new(DatasetOptions::new(name))
    }

    pub fn from_options(options: DatasetOptions) -> CodebrimDatasetBuilder {
        CodebrimDatasetBuilder::new(options)
    }

    /// Loads the manifest and, if requested, every image.
    ///
    /// The dataset name is checked against the registry before the manifest
    /// or any image is touched. With `load_all_in_mem`, the first image that
    /// fails to load aborts construction.
    pub fn new(options: DatasetOptions, transform: Option<Box<dyn ImageTransform>>) -> Result<Self> {
        let registry = DatasetRegistry::load(options.registry_root())?;
        let manifest_path = registry.manifest_path(&options.name)?;
        let cache_dir = options.cache_full_dir()?;

        let manifest = Manifest::from_path(&manifest_path)?
            .filter_split(options.split)
            .truncate(options.row_limit());

        let loader = ImageLoader::new(&cache_dir);
        let store = if options.load_all_in_mem {
            ImageStore::resident(&manifest, &loader)?
        } else {
            ImageStore::Lazy(loader)
        };

        info!(
            "Loaded dataset '{}' ({}): {} samples, {} images resident",
            options.name,
            options.split.map_or("all splits", Split::as_str),
            manifest.len(),
            match &store {
                ImageStore::Resident(images) => images.len(),
                ImageStore::Lazy(_) => 0,
            }
        );

        Ok(Self {
            name: options.name,
            split: options.split,
            cache_dir,
            manifest,
            store,
            transform: transform.unwrap_or_else(|| Box::new(ToTensor)),
        })
    }

    /// Sample at `index`, or the error that prevented producing it.
    pub fn try_get(&self, index: usize) -> Result<CodebrimItem> {
        let record = self.record(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.manifest.len(),
        })?;

        let image = self.store.image(record)?;
        let image = self.transform.apply(&image)?;

        Ok(CodebrimItem {
            image,
            label: record.label_vector(),
            img_name: record.img_name.clone(),
        })
    }

    pub fn record(&self, index: usize) -> Option<&ManifestRecord> {
        self.manifest.get(index)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn split(&self) -> Option<Split> {
        self.split
    }

    /// `<cache_dir>/<name>`, the directory image paths resolve against.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn is_resident(&self) -> bool {
        matches!(self.store, ImageStore::Resident(_))
    }

    pub fn class_names(&self) -> &'static [&'static str] {
        &CLASS_NAMES
    }

    pub fn num_classes(&self) -> usize {
        NUM_CLASSES
    }

    pub fn statistics(&self) -> DatasetStatistics {
        DatasetStatistics::from_manifest(&self.manifest)
    }

    /// Positive samples per class.
    pub fn label_counts(&self) -> [usize; NUM_CLASSES] {
        self.statistics().class_counts
    }
}

/// Burn's data loader stops at the first `None`, so only out-of-range
/// indices map to `None`.
///
/// # Panics
/// If the image of an in-range sample cannot be read or transformed. Use
/// [`CodebrimDataset::try_get`] to handle those errors instead.
impl Dataset<CodebrimItem> for CodebrimDataset {
    fn get(&self, index: usize) -> Option<CodebrimItem> {
        match self.try_get(index) {
            Ok(item) => Some(item),
            Err(Error::IndexOutOfRange { .. }) => None,
            Err(e) => {
                error!("Failed to load sample {index} of '{}': {e}", self.name);
                panic!("Failed to load sample {index} of '{}': {e}", self.name);
            }
        }
    }

    fn len(&self) -> usize {
        self.manifest.len()
    }
}

impl std::fmt::Debug for CodebrimDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodebrimDataset")
            .field("name", &self.name)
            .field("split", &self.split)
            .field("cache_dir", &self.cache_dir)
            .field("len", &self.manifest.len())
            .field("resident", &self.is_resident())
            .finish()
    }
}
