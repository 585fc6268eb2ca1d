//! Tunefetch - a Telegram bot that delivers songs as MP3 audio
//!
//! The bot accepts a free-text song query, resolves it to a media source
//! with yt-dlp, extracts and transcodes the audio track, uploads the file
//! to the requesting chat, and removes the local artifact afterwards.

pub mod bot;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use downloader::{AudioFetcher, DownloadedTrack, TrackMetadata};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error kinds produced by the download pipeline
#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("downloader failed: {0}")]
    Tool(String),

    #[error("no output artifact located for request {0}")]
    ArtifactNotFound(String),

    #[error("file operation failed: {0}")]
    Io(#[from] std::io::Error),
}
