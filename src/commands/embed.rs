//! Hide a message in an image, audio or video file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use hidenseek::crypto::encrypt_message;
use hidenseek::stego::{bits, AudioStego, ImageStego, LsbCarrier, Medium, VideoStego};

use super::{default_output, resolve_medium, CommandExecutor, MediumArg};

/// Hide a message in a carrier file.
#[derive(Args, Debug)]
pub struct EmbedCommand {
    /// Carrier file (image, 16-bit PCM WAV, or video)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// File whose bytes are hidden (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Encrypt the message with this password before hiding it
    #[arg(short, long)]
    pub password: Option<String>,

    /// Output file (defaults to hidenseek_<kind>_<name> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Carrier type (guessed from the extension by default)
    #[arg(long, value_enum)]
    pub medium: Option<MediumArg>,
}

impl CommandExecutor for EmbedCommand {
    fn execute(&self) -> Result<()> {
        let payload = self.payload()?;
        if bits::collides(&payload) {
            eprintln!("WARNING: the message contains 16 consecutive zero bits or ends in a");
            eprintln!("         zero byte; extraction will return it cut short.");
        }

        let medium = resolve_medium(&self.input, self.medium);
        let output = match medium {
            Medium::Image => self.embed_image(&payload)?,
            Medium::Audio => self.embed_audio(&payload)?,
            Medium::Video => self.embed_video(&payload)?,
        };

        println!("Message embedded: {}", output.display());
        println!("  Payload: {} bytes", payload.len());
        Ok(())
    }
}

impl EmbedCommand {
    /// Reads the message and applies encryption if requested.
    fn payload(&self) -> Result<Vec<u8>> {
        let raw = match (&self.message, &self.file) {
            (Some(message), _) => message.trim().as_bytes().to_vec(),
            (None, Some(path)) => std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => bail!("Provide --message or --file"),
        };
        if raw.is_empty() {
            bail!("Please enter a message to embed.");
        }

        match &self.password {
            Some(password) if password.is_empty() => bail!("Password required for encryption."),
            Some(password) => {
                let text = String::from_utf8(raw)
                    .context("Encryption requires a UTF-8 text message")?;
                let token = encrypt_message(&text, password).context("Failed to encrypt message")?;
                Ok(token.into_bytes())
            }
            None => Ok(raw),
        }
    }

    fn output_or(&self, prefix: &str, ext: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input, prefix, ext))
    }

    fn embed_image(&self, payload: &[u8]) -> Result<PathBuf> {
        let mut stego = ImageStego::from_file(&self.input)
            .with_context(|| format!("Failed to load image {}", self.input.display()))?;
        stego.hide(payload).context("Embedding failed")?;

        let output = self.output_or("hidenseek_img", "png");
        stego
            .save(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(output)
    }

    fn embed_audio(&self, payload: &[u8]) -> Result<PathBuf> {
        let mut stego = AudioStego::from_file(&self.input)
            .with_context(|| format!("Failed to load audio {}", self.input.display()))?;
        stego.hide(payload).context("Embedding failed")?;

        let output = self.output_or("hidenseek_audio", "wav");
        stego
            .save(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(output)
    }

    fn embed_video(&self, payload: &[u8]) -> Result<PathBuf> {
        let output = self.output_or("hidenseek_video", "avi");
        ensure_distinct(&self.input, &output)?;

        let report = VideoStego::embed_file(&self.input, &output, payload)
            .context("Embedding failed")?;
        println!(
            "  Frames: {} written, {} carrying data",
            report.frames_written, report.frames_used
        );
        Ok(output)
    }
}

/// Video is streamed, so reading and writing the same file would clobber it.
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        bail!("Output must differ from the input video");
    }
    Ok(())
}
