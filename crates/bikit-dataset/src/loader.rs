//! Image loading from the dataset cache directory.

use std::path::{Path, PathBuf};

use bikit_core::{Error, Result};
use image::DynamicImage;

use crate::manifest::ManifestRecord;

/// Loads manifest images relative to a cache directory.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    /// Root directory containing images
    root_dir: PathBuf,
}

impl ImageLoader {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Loads the image of a manifest record, converted to RGB.
    pub fn load_record(&self, record: &ManifestRecord) -> Result<DynamicImage> {
        self.load_image(&record.img_path)
    }

    /// Decodes an image and converts it to 8-bit RGB.
    pub fn load_image(&self, path: &Path) -> Result<DynamicImage> {
        let full_path = self.full_path(path);

        if !full_path.exists() {
            return Err(Error::NotFound(format!(
                "Image file not found: {}",
                full_path.display()
            )));
        }

        let image = image::open(&full_path)
            .map_err(|e| Error::Image(format!("Failed to load image {}: {}", full_path.display(), e)))?;

        Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.full_path(path).exists()
    }

    /// Absolute paths are returned as is.
    pub fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_image(path: &Path) {
        // 10x10 red image
        let img = image::ImageBuffer::from_fn(10, 10, |_, _| image::Rgb([255u8, 0u8, 0u8]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_full_path_relative() {
        let loader = ImageLoader::new("/data");
        let full = loader.full_path(Path::new("images/test.jpg"));
        assert_eq!(full, PathBuf::from("/data/images/test.jpg"));
    }

    #[test]
    fn test_full_path_absolute() {
        let loader = ImageLoader::new("/data");
        let full = loader.full_path(Path::new("/absolute/path.jpg"));
        assert_eq!(full, PathBuf::from("/absolute/path.jpg"));
    }

    #[test]
    fn test_load_image_not_found() {
        let loader = ImageLoader::new("/tmp");
        let result = loader.load_image(Path::new("nonexistent.jpg"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_image_converts_to_rgb() {
        let temp_dir = TempDir::new().unwrap();
        let gray = image::ImageBuffer::from_pixel(4, 3, image::Luma([200u8]));
        gray.save(temp_dir.path().join("gray.png")).unwrap();

        let loader = ImageLoader::new(temp_dir.path());
        let img = loader.load_image(Path::new("gray.png")).unwrap();
        assert!(matches!(img, DynamicImage::ImageRgb8(_)));
        assert_eq!(img.to_rgb8().get_pixel(0, 0), &image::Rgb([200, 200, 200]));
    }

    #[test]
    fn test_load_corrupt_image() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.png"), b"not a png").unwrap();

        let loader = ImageLoader::new(temp_dir.path());
        match loader.load_image(Path::new("broken.png")) {
            Err(Error::Image(msg)) => assert!(msg.contains("broken.png")),
            other => panic!("expected an image error, got {other:?}"),
        }
    }

    #[test]
    fn test_exists() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ImageLoader::new(temp_dir.path());

        create_test_image(&temp_dir.path().join("test.png"));

        assert!(loader.exists(Path::new("test.png")));
        assert!(!loader.exists(Path::new("nonexistent.png")));
    }
}
