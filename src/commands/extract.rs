//! Recover a hidden message.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use hidenseek::crypto::decrypt_message;
use hidenseek::stego::{AudioStego, ImageStego, LsbCarrier, Medium, VideoStego};

use super::{resolve_medium, CommandExecutor, MediumArg};

/// Extract a hidden message from a carrier file.
///
/// Without -o/--output the message is printed as text (lossy UTF-8).
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Stego file (PNG image, WAV audio, or AVI video)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Password the message was encrypted with
    #[arg(short, long)]
    pub password: Option<String>,

    /// Write the raw message bytes to this file instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Carrier type (guessed from the extension by default)
    #[arg(long, value_enum)]
    pub medium: Option<MediumArg>,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self) -> Result<()> {
        let medium = resolve_medium(&self.input, self.medium);
        let hidden = match medium {
            Medium::Image => ImageStego::from_file(&self.input)
                .with_context(|| format!("Failed to load image {}", self.input.display()))?
                .reveal(),
            Medium::Audio => AudioStego::from_file(&self.input)
                .with_context(|| format!("Failed to load audio {}", self.input.display()))?
                .reveal(),
            Medium::Video => VideoStego::extract_file(&self.input),
        }
        .context("Extraction failed")?;

        let message = match &self.password {
            Some(password) if password.is_empty() => bail!("Password required for decryption."),
            Some(password) => {
                let token = String::from_utf8_lossy(&hidden);
                match decrypt_message(&token, password) {
                    Ok(text) => text.into_bytes(),
                    // Same message whatever went wrong.
                    Err(_) => bail!("Decryption failed: wrong password or corrupted data."),
                }
            }
            None => hidden,
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, &message)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!("Hidden message written to: {}", output_path.display());
            println!("  Size: {} bytes", message.len());
        } else {
            println!("{}", String::from_utf8_lossy(&message));
        }

        Ok(())
    }
}
