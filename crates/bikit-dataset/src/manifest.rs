//! CSV manifest parsing and filtering.
//!
//! A manifest row names an image, its path relative to the image cache, its
//! split and one boolean column per defect class. Rows are turned into
//! fixed-size [`ManifestRecord`]s once at load time so that indexed access
//! never looks columns up by name.

use std::io::Read;
use std::path::{Path, PathBuf};

use bikit_core::{DefectClass, Error, Result, Split, NUM_CLASSES};
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// One sample of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Unique image name
    pub img_name: String,
    /// Path relative to the dataset's cache directory
    pub img_path: PathBuf,
    pub split: Split,
    /// Class presence flags in [`DefectClass::ALL`] order
    pub labels: [bool; NUM_CLASSES],
}

impl ManifestRecord {
    pub fn has(&self, class: DefectClass) -> bool {
        self.labels[class.index()]
    }

    /// Multi-hot label vector: 1.0 where the class is present.
    pub fn label_vector(&self) -> [f32; NUM_CLASSES] {
        self.labels.map(|present| if present { 1.0 } else { 0.0 })
    }

    pub fn classes(&self) -> impl Iterator<Item = DefectClass> + '_ {
        DefectClass::ALL
            .into_iter()
            .filter(move |class| self.has(*class))
    }
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    img_name: String,
    img_path: String,
    split_type: Split,
    #[serde(rename = "Background", deserialize_with = "deserialize_flag")]
    background: bool,
    #[serde(rename = "Crack", deserialize_with = "deserialize_flag")]
    crack: bool,
    #[serde(rename = "Spallation", deserialize_with = "deserialize_flag")]
    spallation: bool,
    #[serde(rename = "Efflorescence", deserialize_with = "deserialize_flag")]
    efflorescence: bool,
    #[serde(rename = "ExposedBars", deserialize_with = "deserialize_flag")]
    exposed_bars: bool,
    #[serde(rename = "CorrosionStain", deserialize_with = "deserialize_flag")]
    corrosion_stain: bool,
}

impl From<ManifestRow> for ManifestRecord {
    fn from(row: ManifestRow) -> Self {
        Self {
            img_name: row.img_name,
            img_path: PathBuf::from(row.img_path),
            split: row.split_type,
            labels: [
                row.background,
                row.crack,
                row.spallation,
                row.efflorescence,
                row.exposed_bars,
                row.corrosion_stain,
            ],
        }
    }
}

/// Accepts the spellings pandas and hand-written manifests produce.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Ok(true),
        "false" | "0" | "0.0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean class flag, got '{other}'"
        ))),
    }
}

/// Ordered manifest rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<ManifestRecord>,
}

impl Manifest {
    pub fn new(records: Vec<ManifestRecord>) -> Self {
        Self { records }
    }

    /// Reads a manifest CSV from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Manifest not found: {}",
                path.display()
            )));
        }

        let manifest = Self::from_csv_reader(csv::Reader::from_path(path)?)?;
        debug!("Read {} rows from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv_reader(csv::Reader::from_reader(reader))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let records = reader
            .deserialize::<ManifestRow>()
            .map(|row| row.map(ManifestRecord::from).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Keeps rows of `split`, preserving file order. `None` keeps everything.
    pub fn filter_split(mut self, split: Option<Split>) -> Self {
        if let Some(split) = split {
            self.records.retain(|record| record.split == split);
            debug!("{} rows after filtering split '{}'", self.records.len(), split);
        }
        self
    }

    /// Keeps at most the first `limit` rows.
    pub fn truncate(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.records.truncate(limit);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ManifestRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ManifestRecord] {
        &self.records
    }
}
