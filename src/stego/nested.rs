//! Image-in-image embedding.
//!
//! The secret image is serialized to PNG and base64 encoded, and the text is
//! hidden in the cover like any other message. When the text does not fit,
//! the secret is shrunk by a fixed ratio per side and serialized again, until
//! it fits or a side would drop below one pixel. Every step removes about 19%
//! of the pixels, so the loop ends after a logarithmic number of rounds.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use super::bits::frame_len;
use super::{ImageStego, LsbCarrier, StegoError};

/// Default per-side shrink ratio.
pub const DEFAULT_SHRINK_RATIO: f64 = 0.9;

/// Tuning for the shrink loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestConfig {
    /// Factor applied to each side per round; must lie in (0, 1).
    pub shrink_ratio: f64,

    /// Resampling filter used when shrinking.
    pub filter: FilterType,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            shrink_ratio: DEFAULT_SHRINK_RATIO,
            filter: FilterType::Lanczos3,
        }
    }
}

/// A secret image serialized so that it fits a given capacity.
#[derive(Debug, Clone)]
pub struct NestedImage {
    text: String,
    width: u32,
    height: u32,
    rounds: u32,
}

impl NestedImage {
    /// Serializes `secret`, shrinking it until its frame fits in `capacity` slots.
    pub fn fit(
        secret: &DynamicImage,
        capacity: usize,
        config: &NestConfig,
    ) -> Result<Self, StegoError> {
        let ratio = if config.shrink_ratio > 0.0 && config.shrink_ratio < 1.0 {
            config.shrink_ratio
        } else {
            log::warn!(
                "shrink ratio {} out of range, using {}",
                config.shrink_ratio,
                DEFAULT_SHRINK_RATIO
            );
            DEFAULT_SHRINK_RATIO
        };

        let mut current = DynamicImage::ImageRgba8(secret.to_rgba8());
        let mut text = encode_png_base64(&current)?;
        let mut rounds = 0;

        while frame_len(text.len()) > capacity {
            let (width, height) = current.dimensions();
            let new_width = (width as f64 * ratio) as u32;
            let new_height = (height as f64 * ratio) as u32;
            if new_width < 1 || new_height < 1 {
                return Err(StegoError::SecretTooSmall);
            }

            current = current.resize_exact(new_width, new_height, config.filter);
            text = encode_png_base64(&current)?;
            rounds += 1;
            log::debug!(
                "secret shrunk to {}x{}: {} bits for {} slots",
                new_width,
                new_height,
                frame_len(text.len()),
                capacity
            );
        }

        let (width, height) = current.dimensions();
        Ok(Self {
            text,
            width,
            height,
            rounds,
        })
    }

    /// Base64 text of the PNG that will be hidden.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Final dimensions of the secret.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of shrink rounds that were needed.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Hides `secret` in `cover`, shrinking it as needed.
    pub fn embed(
        cover: &mut ImageStego,
        secret: &DynamicImage,
        config: &NestConfig,
    ) -> Result<Self, StegoError> {
        let nested = Self::fit(secret, cover.capacity(), config)?;
        cover.hide(nested.text.as_bytes())?;
        Ok(nested)
    }

    /// Recovers the hidden PNG file from a stego image.
    pub fn extract(stego: &ImageStego) -> Result<Vec<u8>, StegoError> {
        let text = stego.reveal()?;
        let png = BASE64
            .decode(&text)
            .map_err(|_| StegoError::InvalidEmbeddedImage)?;
        if image::guess_format(&png).is_err() {
            return Err(StegoError::InvalidEmbeddedImage);
        }
        Ok(png)
    }
}

fn encode_png_base64(image: &DynamicImage) -> Result<String, StegoError> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| StegoError::ImageSave(e.to_string()))?;
    Ok(BASE64.encode(&png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn cover(width: u32, height: u32) -> ImageStego {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
        });
        ImageStego::from_image(DynamicImage::ImageRgb8(img))
    }

    /// Pseudo-random pixels so PNG cannot compress them away.
    fn noisy_secret(width: u32, height: u32) -> DynamicImage {
        let mut state = 0x2545_f491_u32;
        let img = ImageBuffer::from_fn(width, height, |_, _| {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xff) as u8
            };
            Rgba([next(), next(), next(), 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_small_secret_fits_without_shrinking() {
        let mut cover = cover(200, 200);
        let secret = noisy_secret(10, 10);

        let nested = NestedImage::embed(&mut cover, &secret, &NestConfig::default()).unwrap();
        assert_eq!(nested.rounds(), 0);
        assert_eq!(nested.dimensions(), (10, 10));

        let png = NestedImage::extract(&cover).unwrap();
        let revealed = image::load_from_memory(&png).unwrap();
        assert_eq!(revealed.to_rgba8(), secret.to_rgba8());
    }

    #[test]
    fn test_large_secret_is_shrunk_until_it_fits() {
        let mut cover = cover(40, 40);
        let secret = noisy_secret(64, 64);
        assert!(frame_len(encode_png_base64(&secret).unwrap().len()) > cover.capacity());

        let nested = NestedImage::embed(&mut cover, &secret, &NestConfig::default()).unwrap();
        assert!(nested.rounds() > 0);
        assert!(frame_len(nested.text().len()) <= cover.capacity());

        let png = NestedImage::extract(&cover).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
        let revealed = image::load_from_memory(&png).unwrap();
        assert_eq!(revealed.dimensions(), nested.dimensions());
    }

    #[test]
    fn test_shrink_follows_ratio() {
        let secret = noisy_secret(100, 50);
        let unshrunk = frame_len(encode_png_base64(&secret).unwrap().len());

        let nested = NestedImage::fit(&secret, unshrunk - 1, &NestConfig::default()).unwrap();
        assert!(nested.rounds() >= 1);
        if nested.rounds() == 1 {
            assert_eq!(nested.dimensions(), (90, 45));
        }
    }

    #[test]
    fn test_tiny_cover_rejects_secret() {
        let mut cover = cover(3, 1);
        let secret = noisy_secret(4, 4);
        let before = cover.image().clone();

        let result = NestedImage::embed(&mut cover, &secret, &NestConfig::default());
        assert!(matches!(result, Err(StegoError::SecretTooSmall)));
        assert_eq!(cover.image(), &before);
    }

    #[test]
    fn test_plain_text_is_not_an_image() {
        let mut cover = cover(50, 50);
        cover.hide(b"just a message").unwrap();
        assert!(matches!(
            NestedImage::extract(&cover),
            Err(StegoError::InvalidEmbeddedImage)
        ));
    }

    #[test]
    fn test_base64_of_non_image_is_rejected() {
        let mut cover = cover(50, 50);
        cover.hide(BASE64.encode(b"not a png").as_bytes()).unwrap();
        assert!(matches!(
            NestedImage::extract(&cover),
            Err(StegoError::InvalidEmbeddedImage)
        ));
    }
}
