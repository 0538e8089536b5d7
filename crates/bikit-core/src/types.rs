//! Core type definitions shared by the dataset adapters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// Number of CODEBRIM defect classes.
pub const NUM_CLASSES: usize = 6;

/// CODEBRIM class names, in label-vector order.
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "Background",
    "Crack",
    "Spallation",
    "Efflorescence",
    "ExposedBars",
    "CorrosionStain",
];

/// A CODEBRIM defect class.
///
/// Classes are not mutually exclusive: a single image may show a crack,
/// spallation and exposed bars at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefectClass {
    Background,
    Crack,
    Spallation,
    Efflorescence,
    ExposedBars,
    CorrosionStain,
}

impl DefectClass {
    /// All classes in label-vector order.
    pub const ALL: [DefectClass; NUM_CLASSES] = [
        DefectClass::Background,
        DefectClass::Crack,
        DefectClass::Spallation,
        DefectClass::Efflorescence,
        DefectClass::ExposedBars,
        DefectClass::CorrosionStain,
    ];

    /// Position of this class in the label vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Manifest column name for this class.
    pub fn name(self) -> &'static str {
        CLASS_NAMES[self.index()]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for DefectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Data split as written in the manifest's `split_type` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training data
    Train,
    /// Validation data
    Valid,
    /// Test data
    Test,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            "test" => Ok(Split::Test),
            other => Err(Error::InvalidArgument(format!(
                "Unknown split '{other}', expected one of: train, valid, test"
            ))),
        }
    }
}
