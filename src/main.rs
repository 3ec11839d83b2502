//! HideNseek - hide messages in images, audio and video
//!
//! A CLI tool for LSB steganography. Every command reads a carrier file and
//! writes a new one; the input is never modified.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{
    CapacityCommand, CommandExecutor, EmbedCommand, ExtractCommand, NestCommand, UnnestCommand,
};

/// HideNseek - hide messages in images, audio and video
///
/// Messages go into the least significant bits of image channels, 16-bit PCM
/// samples, or the blue channel of video frames.
#[derive(Parser)]
#[command(name = "hidenseek")]
#[command(version)]
#[command(about = "LSB steganography for images, WAV audio and video")]
#[command(long_about = None)]
struct Cli {
    /// Increase log output (-v debug, -vv trace); RUST_LOG also works
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a text message or file in an image, WAV or video
    Embed(EmbedCommand),

    /// Extract a hidden message from an image, WAV or video
    Extract(ExtractCommand),

    /// Hide an image inside another image (the secret is shrunk to fit)
    Nest(NestCommand),

    /// Recover an image hidden with `nest`
    Unnest(UnnestCommand),

    /// Show how many bits a carrier can hold
    Capacity(CapacityCommand),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG, when set, refines the level chosen on the command line.
    builder.parse_default_env();
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Embed(cmd) => cmd.execute(),
        Commands::Extract(cmd) => cmd.execute(),
        Commands::Nest(cmd) => cmd.execute(),
        Commands::Unnest(cmd) => cmd.execute(),
        Commands::Capacity(cmd) => cmd.execute(),
    }
}
