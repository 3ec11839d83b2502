//! Slot counting per carrier type.

use super::bits::DELIMITER_LEN;
use super::StegoError;

/// Shape of a carrier, as far as its capacity is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierDescriptor {
    /// One slot per R, G and B channel of every pixel.
    Image { width: u32, height: u32 },
    /// One slot per 16-bit sample, channels interleaved as stored.
    Audio { sample_count: usize },
    /// One slot per pixel per frame (blue channel only).
    Video {
        frame_count: u64,
        width: u32,
        height: u32,
    },
}

impl CarrierDescriptor {
    /// Number of LSB slots the carrier offers.
    ///
    /// Dimensions come from file headers, so the product saturates at
    /// `usize::MAX` instead of overflowing.
    pub fn capacity(&self) -> usize {
        match *self {
            Self::Image { width, height } => (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(3),
            Self::Audio { sample_count } => sample_count,
            Self::Video {
                frame_count,
                width,
                height,
            } => usize::try_from(frame_count)
                .unwrap_or(usize::MAX)
                .saturating_mul(width as usize)
                .saturating_mul(height as usize),
        }
    }

    /// Largest payload, in bytes, whose frame still fits.
    pub fn max_payload_bytes(&self) -> usize {
        self.capacity().saturating_sub(DELIMITER_LEN) / 8
    }
}

/// Checks that a frame of `bit_len` bits fits into `capacity` slots.
pub fn validate(capacity: usize, bit_len: usize) -> Result<(), StegoError> {
    if bit_len > capacity {
        return Err(StegoError::InsufficientCapacity {
            needed: bit_len,
            capacity,
        });
    }
    Ok(())
}
