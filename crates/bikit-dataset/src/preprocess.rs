//! Resize-and-normalize transform.
//!
//! An alternative to [`ToTensor`](crate::ToTensor) for callers whose network
//! expects a fixed input size and ImageNet-style standardisation.

use bikit_core::{Error, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::transform::{ImageTensor, ImageTransform, ToTensor};

/// Configuration for [`Preprocess`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreprocessConfig {
    /// Target `(width, height)`; images keep their size when `None`
    pub resize: Option<(u32, u32)>,
    /// Per-channel means [R, G, B]
    pub mean: [f32; 3],
    /// Per-channel standard deviations [R, G, B]
    pub std: [f32; 3],
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            resize: Some((224, 224)),
            // ImageNet normalization values
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Resizes, scales to `[0, 1]` and standardises each channel.
#[derive(Debug, Clone)]
pub struct Preprocess {
    config: PreprocessConfig,
}

impl Preprocess {
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        if config.std.iter().any(|s| *s <= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Standard deviations must be positive, got {:?}",
                config.std
            )));
        }
        if matches!(config.resize, Some((0, _)) | Some((_, 0))) {
            return Err(Error::InvalidArgument(
                "Resize dimensions must be non-zero".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Inverse of the standardisation step, back to `[0, 1]` values.
    ///
    /// Only RGB tensors can be denormalized.
    pub fn denormalize(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        if tensor.channels() != 3 {
            return Err(Error::InvalidArgument(format!(
                "Expected a 3-channel tensor, got shape {:?}",
                tensor.shape
            )));
        }

        let plane = tensor.height() * tensor.width();
        Ok(tensor
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let c = i / plane;
                v * self.config.std[c] + self.config.mean[c]
            })
            .collect())
    }
}

impl ImageTransform for Preprocess {
    fn apply(&self, image: &DynamicImage) -> Result<ImageTensor> {
        let mut tensor = match self.config.resize {
            Some((w, h)) if image.width() != w || image.height() != h => {
                ToTensor.apply(&image.resize_exact(w, h, FilterType::Triangle))?
            }
            _ => ToTensor.apply(image)?,
        };

        let plane = tensor.height() * tensor.width();
        for (c, channel) in tensor.data.chunks_mut(plane.max(1)).enumerate() {
            for v in channel {
                *v = (*v - self.config.mean[c]) / self.config.std[c];
            }
        }

        Ok(tensor)
    }
}
