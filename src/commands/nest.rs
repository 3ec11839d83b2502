//! Hide an image inside another image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hidenseek::stego::bits::frame_len;
use hidenseek::stego::nested::DEFAULT_SHRINK_RATIO;
use hidenseek::stego::{ImageStego, LsbCarrier, NestConfig, NestedImage};

use super::{default_output, CommandExecutor};

/// Hide a secret image inside a cover image, shrinking the secret if needed.
#[derive(Args, Debug)]
pub struct NestCommand {
    /// Cover image
    #[arg(short, long)]
    pub cover: PathBuf,

    /// Secret image to hide
    #[arg(short, long)]
    pub secret: PathBuf,

    /// Output PNG (defaults to hidenseek_imgimg_<cover>.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-side shrink factor applied while the secret does not fit
    #[arg(long, default_value_t = DEFAULT_SHRINK_RATIO)]
    pub shrink_ratio: f64,
}

impl CommandExecutor for NestCommand {
    fn execute(&self) -> Result<()> {
        let mut cover = ImageStego::from_file(&self.cover)
            .with_context(|| format!("Failed to load cover {}", self.cover.display()))?;
        let secret = image::open(&self.secret)
            .with_context(|| format!("Failed to load secret {}", self.secret.display()))?;

        let config = NestConfig {
            shrink_ratio: self.shrink_ratio,
            ..NestConfig::default()
        };
        let capacity = cover.capacity();
        let nested = NestedImage::embed(&mut cover, &secret, &config).context("Embedding failed")?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.cover, "hidenseek_imgimg", "png"));
        cover
            .save(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        let (width, height) = nested.dimensions();
        println!("Secret image embedded: {}", output.display());
        if nested.rounds() > 0 {
            println!(
                "  Resized from {}x{} to {}x{} to fit",
                secret.width(),
                secret.height(),
                width,
                height
            );
        }
        println!("  Used {} of {} slots", frame_len(nested.text().len()), capacity);
        Ok(())
    }
}
