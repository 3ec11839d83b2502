//! LSB steganography for images.
//!
//! The cover is normalized to 8-bit RGB (alpha is dropped). Slots are the R,
//! G and B values of every pixel in raster order, so a `w x h` image holds
//! `w * h * 3` bits. The stego image is always written as PNG.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;

use super::{CarrierDescriptor, LsbCarrier, StegoError};

/// Image steganography handler.
pub struct ImageStego {
    image: RgbImage,
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let image = image::open(path).map_err(|e| StegoError::ImageLoad(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| StegoError::ImageLoad(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from a DynamicImage.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    /// Returns the capacity descriptor of this cover.
    pub fn descriptor(&self) -> CarrierDescriptor {
        let (width, height) = self.image.dimensions();
        CarrierDescriptor::Image { width, height }
    }

    /// Saves the image to a file, always PNG-encoded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| StegoError::ImageSave(e.to_string()))
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::ImageSave(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl LsbCarrier for ImageStego {
    fn capacity(&self) -> usize {
        self.descriptor().capacity()
    }

    fn embed_bits(&mut self, bits: &[bool]) {
        // The raw buffer is already R, G, B per pixel in raster order.
        for (channel, &bit) in self.image.iter_mut().zip(bits) {
            *channel = (*channel & !1) | u8::from(bit);
        }
    }

    fn scan(&self) -> Vec<bool> {
        self.image.iter().map(|channel| channel & 1 == 1).collect()
    }
}
