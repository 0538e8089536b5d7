//! Image-to-tensor transforms.

use bikit_core::{Error, Result};
use burn::prelude::*;
use image::DynamicImage;

/// Dense image data in CHW layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub data: Vec<f32>,
    /// `[channels, height, width]`
    pub shape: [usize; 3],
}

impl ImageTensor {
    pub fn new(data: Vec<f32>, shape: [usize; 3]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "Shape {:?} requires {} values, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { data, shape })
    }

    pub fn channels(&self) -> usize {
        self.shape[0]
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 3> {
        Tensor::from_floats(TensorData::new(self.data.clone(), self.shape), device)
    }
}

/// Converts a decoded image into the tensor handed to the training loop.
///
/// Implemented by [`ToTensor`], [`Preprocess`](crate::Preprocess) and any
/// `Fn(&DynamicImage) -> Result<ImageTensor>` closure.
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: &DynamicImage) -> Result<ImageTensor>;
}

impl<F> ImageTransform for F
where
    F: Fn(&DynamicImage) -> Result<ImageTensor> + Send + Sync,
{
    fn apply(&self, image: &DynamicImage) -> Result<ImageTensor> {
        self(image)
    }
}

/// Default transform: RGB pixels scaled to `[0, 1]`, CHW layout, no resizing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl ImageTransform for ToTensor {
    fn apply(&self, image: &DynamicImage) -> Result<ImageTensor> {
        let rgb = image.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let plane = height * width;
        let mut data = vec![0.0f32; 3 * plane];

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let offset = y as usize * width + x as usize;
            data[offset] = pixel[0] as f32 / 255.0;
            data[plane + offset] = pixel[1] as f32 / 255.0;
            data[2 * plane + offset] = pixel[2] as f32 / 255.0;
        }

        ImageTensor::new(data, [3, height, width])
    }
}
