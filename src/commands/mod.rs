//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod embed;
mod extract;
mod nest;
mod unnest;

pub use capacity::CapacityCommand;
pub use embed::EmbedCommand;
pub use extract::ExtractCommand;
pub use nest::NestCommand;
pub use unnest::UnnestCommand;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;

use hidenseek::stego::Medium;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Carrier type selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediumArg {
    Image,
    Audio,
    Video,
}

impl From<MediumArg> for Medium {
    fn from(arg: MediumArg) -> Self {
        match arg {
            MediumArg::Image => Medium::Image,
            MediumArg::Audio => Medium::Audio,
            MediumArg::Video => Medium::Video,
        }
    }
}

/// Uses the explicit medium if given, otherwise guesses from the extension.
fn resolve_medium(path: &Path, explicit: Option<MediumArg>) -> Medium {
    explicit
        .map(Medium::from)
        .unwrap_or_else(|| Medium::from_path(path))
}

/// Builds `<dir of input>/<prefix>_<stem>.<ext>`.
fn default_output(input: &Path, prefix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_{}.{}", prefix, stem, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("media/cat.jpg"), "hidenseek_img", "png"),
            PathBuf::from("media/hidenseek_img_cat.png")
        );
        assert_eq!(
            default_output(Path::new("song.wav"), "hidenseek_audio", "wav"),
            PathBuf::from("hidenseek_audio_song.wav")
        );
    }

    #[test]
    fn test_explicit_medium_wins() {
        assert_eq!(
            resolve_medium(Path::new("clip.wav"), Some(MediumArg::Video)),
            Medium::Video
        );
        assert_eq!(resolve_medium(Path::new("clip.wav"), None), Medium::Audio);
    }
}
