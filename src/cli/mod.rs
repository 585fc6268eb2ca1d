use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tunefetch",
    about = "Telegram bot that fetches songs and delivers them as MP3 audio",
    version,
    long_about = "A Telegram bot that resolves free-text song queries with yt-dlp, transcodes the audio track to MP3, and uploads the file to the requesting chat. The bot token is read from the BOT_TOKEN environment variable."
)]
pub struct Cli {
    /// Path to the YAML config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory for transient audio files
    #[arg(short, long, env = "TUNEFETCH_DOWNLOAD_DIR", value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
