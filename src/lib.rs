//! # HideNseek - hide messages in images, audio and video
//!
//! HideNseek hides a byte payload in the least significant bits of a carrier
//! and recovers it later without loss.
//!
//! ## Carriers
//!
//! - **Image**: R, G and B of every pixel, raster order. Output is PNG.
//! - **Audio**: every sample of a 16-bit PCM WAV, in storage order.
//! - **Video**: the blue channel of every pixel of every frame, streamed.
//!   Any video FFmpeg decodes is accepted; output is lossless AVI.
//! - **Image in image**: a secret image is shrunk until its PNG encoding fits
//!   the cover, then hidden as base64 text.
//!
//! ## Framing
//!
//! Every carrier uses the same frame: the payload bits (MSB first) followed by
//! sixteen zero bits. Extraction stops at the first run of sixteen zero bits,
//! so payloads containing such a run are truncated. Text, base64 and the
//! tokens produced by [`crypto::encrypt_message`] never are.
//!
//! ## Example Usage
//!
//! ```rust
//! use hidenseek::stego::{ImageStego, LsbCarrier};
//! use image::{DynamicImage, RgbImage};
//!
//! let cover = DynamicImage::ImageRgb8(RgbImage::new(32, 32));
//! let mut stego = ImageStego::from_image(cover);
//!
//! stego.hide(b"meet at noon").unwrap();
//! assert_eq!(stego.reveal().unwrap(), b"meet at noon");
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: framing, capacity and the carriers
//! - [`crypto`]: optional password encryption of messages

pub mod crypto;
pub mod stego;

// Re-export commonly used types at the crate root
pub use crypto::{decrypt_message, encrypt_message, CryptoError};
pub use stego::bits::DELIMITER_LEN;
pub use stego::{
    AudioStego, CarrierDescriptor, ImageStego, LsbCarrier, Medium, NestConfig, NestedImage,
    StegoError, VideoStego,
};
