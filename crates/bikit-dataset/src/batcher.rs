//! Batching CODEBRIM items into Burn tensors.

use bikit_core::NUM_CLASSES;
use burn::data::dataloader::batcher::Batcher;
use burn::prelude::*;

use crate::dataset::CodebrimItem;

/// A batch of CODEBRIM samples
#[derive(Clone, Debug)]
pub struct CodebrimBatch<B: Backend> {
    /// Images with shape [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,
    /// Multi-hot targets with shape [batch_size, 6]
    pub targets: Tensor<B, 2>,
}

/// Stacks items into a [`CodebrimBatch`].
///
/// All items in a batch must share one image shape, which holds whenever the
/// dataset's transform resizes to a fixed size. [`ToTensor`](crate::ToTensor)
/// keeps the decoded size, so pair it with a resizing transform before
/// batching.
///
/// # Panics
/// If an item's image shape differs from the first item's.
#[derive(Clone, Debug)]
pub struct CodebrimBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> CodebrimBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<CodebrimItem, CodebrimBatch<B>> for CodebrimBatcher<B> {
    fn batch(&self, items: Vec<CodebrimItem>) -> CodebrimBatch<B> {
        let batch_size = items.len();
        let shape = items
            .first()
            .map(|item| item.image.shape)
            .unwrap_or([3, 0, 0]);
        for item in items.iter().skip(1) {
            assert_eq!(
                item.image.shape, shape,
                "CodebrimBatcher: image '{}' has shape {:?}, expected {:?} from '{}'",
                item.img_name, item.image.shape, shape, items[0].img_name,
            );
        }
        let [channels, height, width] = shape;

        let images_data: Vec<f32> = items
            .iter()
            .flat_map(|item| item.image.data.iter().copied())
            .collect();
        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, channels, height, width]),
            &self.device,
        );

        let targets_data: Vec<f32> = items.iter().flat_map(|item| item.label).collect();
        let targets = Tensor::<B, 2>::from_floats(
            TensorData::new(targets_data, [batch_size, NUM_CLASSES]),
            &self.device,
        );

        CodebrimBatch { images, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ImageTensor;
    use burn::backend::NdArray;

    fn item(value: f32, label: [f32; NUM_CLASSES]) -> CodebrimItem {
        CodebrimItem {
            image: ImageTensor::new(vec![value; 3 * 2 * 2], [3, 2, 2]).unwrap(),
            label,
            img_name: format!("{value}.png"),
        }
    }

    fn item_with_shape(value: f32, shape: [usize; 3]) -> CodebrimItem {
        CodebrimItem {
            image: ImageTensor::new(vec![value; shape.iter().product()], shape).unwrap(),
            label: [0.0; NUM_CLASSES],
            img_name: format!("{value}.png"),
        }
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = CodebrimBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            item(0.0, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            item(1.0, [0.0, 1.0, 1.0, 0.0, 0.0, 1.0]),
        ]);

        assert_eq!(batch.images.dims(), [2, 3, 2, 2]);
        assert_eq!(batch.targets.dims(), [2, 6]);
    }

    #[test]
    #[should_panic(expected = "image '1.png' has shape [3, 5, 5], expected [3, 4, 6]")]
    fn test_batch_rejects_different_sizes() {
        let batcher = CodebrimBatcher::<NdArray>::new(Default::default());
        batcher.batch(vec![
            item_with_shape(0.0, [3, 4, 6]),
            item_with_shape(1.0, [3, 5, 5]),
        ]);
    }

    #[test]
    #[should_panic(expected = "image '1.png' has shape [3, 6, 4], expected [3, 4, 6]")]
    fn test_batch_rejects_transposed_layout() {
        // Same element count, different layout
        let batcher = CodebrimBatcher::<NdArray>::new(Default::default());
        batcher.batch(vec![
            item_with_shape(0.0, [3, 4, 6]),
            item_with_shape(1.0, [3, 6, 4]),
        ]);
    }

    #[test]
    fn test_batch_targets_keep_order() {
        let batcher = CodebrimBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            item(0.0, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            item(0.5, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        ]);

        let targets = batch.targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(
            targets,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );

        let images = batch.images.into_data().to_vec::<f32>().unwrap();
        assert!(images[..12].iter().all(|v| *v == 0.0));
        assert!(images[12..].iter().all(|v| *v == 0.5));
    }
}
