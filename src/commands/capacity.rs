//! Report how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hidenseek::stego::{AudioStego, CarrierDescriptor, ImageStego, Medium, VideoStego};

use super::{resolve_medium, CommandExecutor, MediumArg};

/// Show the LSB capacity of a carrier file.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Carrier file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Carrier type (guessed from the extension by default)
    #[arg(long, value_enum)]
    pub medium: Option<MediumArg>,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let medium = resolve_medium(&self.input, self.medium);
        let descriptor = match medium {
            Medium::Image => ImageStego::from_file(&self.input)
                .with_context(|| format!("Failed to load image {}", self.input.display()))?
                .descriptor(),
            Medium::Audio => AudioStego::from_file(&self.input)
                .with_context(|| format!("Failed to load audio {}", self.input.display()))?
                .descriptor(),
            Medium::Video => {
                let mut source = VideoStego::open(&self.input)
                    .with_context(|| format!("Failed to open video {}", self.input.display()))?;
                VideoStego::descriptor(source.as_mut()).context("Failed to read video")?
            }
        };

        println!("Carrier: {}", self.input.display());
        match descriptor {
            CarrierDescriptor::Image { width, height } => {
                println!("  Image: {}x{} (RGB)", width, height)
            }
            CarrierDescriptor::Audio { sample_count } => {
                println!("  Audio: {} samples (16-bit PCM)", sample_count)
            }
            CarrierDescriptor::Video {
                frame_count,
                width,
                height,
            } => println!("  Video: {} frames of {}x{} (blue channel)", frame_count, width, height),
        }
        println!("  Slots: {}", descriptor.capacity());
        println!("  Max payload: {} bytes", descriptor.max_payload_bytes());
        Ok(())
    }
}
