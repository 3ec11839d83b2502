//! Steganography module for hiding data in various carriers.
//!
//! Supports:
//! - Image LSB steganography (any readable format in, PNG out)
//! - Audio LSB steganography (16-bit PCM WAV)
//! - Video LSB steganography (blue channel, FFmpeg in, rawvideo AVI out)
//! - Image-in-image with automatic shrinking of the secret

pub mod audio;
pub mod bits;
pub mod capacity;
mod error;
pub mod image;
pub mod nested;
pub mod video;

use std::path::Path;

pub use audio::AudioStego;
pub use capacity::{validate, CarrierDescriptor};
pub use error::StegoError;
pub use image::ImageStego;
pub use nested::{NestConfig, NestedImage};
pub use video::{VideoFrame, VideoInfo, VideoStego};

/// A carrier whose slots are all held in memory.
///
/// Slots are addressed in a fixed order; each one stores a single bit in its
/// least significant bit.
pub trait LsbCarrier {
    /// Total number of slots.
    fn capacity(&self) -> usize;

    /// Writes `bits` into the first `bits.len()` slots, leaving the rest untouched.
    ///
    /// Callers must have checked the length against [`LsbCarrier::capacity`].
    fn embed_bits(&mut self, bits: &[bool]);

    /// Reads the LSB of every slot, in order.
    fn scan(&self) -> Vec<bool>;

    /// Frames `payload` and writes it into the carrier.
    ///
    /// Nothing is modified if the frame does not fit.
    fn hide(&mut self, payload: &[u8]) -> Result<(), StegoError> {
        let frame = bits::encode(payload);
        validate(self.capacity(), frame.len())?;
        log::debug!(
            "embedding {} payload bytes ({} bits) into {} slots",
            payload.len(),
            frame.len(),
            self.capacity()
        );
        self.embed_bits(&frame);
        Ok(())
    }

    /// Scans the carrier and returns the payload up to the delimiter.
    fn reveal(&self) -> Result<Vec<u8>, StegoError> {
        bits::unframe(&self.scan())
    }
}

/// The kind of medium a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Image,
    Audio,
    Video,
}

impl Medium {
    /// Guesses the medium from the file extension.
    ///
    /// `.wav` is audio, common video container extensions are video, and
    /// everything else is handed to the image decoder.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("wav") | Some("wave") => Self::Audio,
            Some("avi") | Some("mp4") | Some("mkv") | Some("mov") | Some("webm") => Self::Video,
            _ => Self::Image,
        }
    }
}
