//! Recover an image hidden with `nest`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hidenseek::stego::{ImageStego, NestedImage};

use super::{default_output, CommandExecutor};

/// Recover a secret image from a stego image.
#[derive(Args, Debug)]
pub struct UnnestCommand {
    /// Stego image produced by `nest`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PNG (defaults to hidenseek_revealed_<input>.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for UnnestCommand {
    fn execute(&self) -> Result<()> {
        let stego = ImageStego::from_file(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;
        let png = NestedImage::extract(&stego).context("Extraction failed")?;

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output(&self.input, "hidenseek_revealed", "png"));
        std::fs::write(&output, &png)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        println!("Secret image recovered: {}", output.display());
        println!("  Size: {} bytes", png.len());
        Ok(())
    }
}
