//! CODEBRIM dataset adapter.
//!
//! This crate exposes the CODEBRIM structural defect dataset to Burn training
//! loops: a CSV manifest selects samples, images come from a local cache
//! directory filled by an external downloader, and every sample carries a
//! six-class multi-hot label.
//!
//! ```rust,ignore
//! use bikit_core::Split;
//! use bikit_dataset::CodebrimDataset;
//! use burn::data::dataset::Dataset;
//!
//! let train = CodebrimDataset::builder("codebrim-classif-balanced")
//!     .split(Split::Train)
//!     .load_all_in_mem(true)
//!     .build()?;
//! let item = train.try_get(0)?;
//! assert_eq!(item.label.len(), 6);
//! ```

pub mod batcher;
pub mod dataset;
pub mod loader;
pub mod manifest;
pub mod preprocess;
pub mod registry;
pub mod statistics;
pub mod transform;

pub use batcher::{CodebrimBatch, CodebrimBatcher};
pub use dataset::{CodebrimDataset, CodebrimDatasetBuilder, CodebrimItem};
pub use loader::ImageLoader;
pub use manifest::{Manifest, ManifestRecord};
pub use preprocess::{Preprocess, PreprocessConfig};
pub use registry::DatasetRegistry;
pub use statistics::DatasetStatistics;
pub use transform::{ImageTensor, ImageTransform, ToTensor};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batcher::*;
    pub use crate::dataset::*;
    pub use crate::manifest::*;
    pub use crate::transform::*;
    pub use bikit_core::{DatasetOptions, DefectClass, Split, CLASS_NAMES, NUM_CLASSES};
}
