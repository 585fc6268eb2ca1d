use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Environment variable supplying the bot's authentication token
pub const TOKEN_ENV: &str = "BOT_TOKEN";

/// Process-wide configuration, resolved once at startup and passed
/// explicitly into the handler construction
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token; never written to the config file
    pub token: String,

    /// Downloader settings
    pub downloader: DownloaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderConfig {
    /// Working directory for transient per-request audio files
    pub download_dir: PathBuf,

    /// Fetch/transcode binary
    pub yt_dlp_path: PathBuf,

    /// Target codec for the audio extraction post-processor
    pub audio_format: String,

    /// Target bitrate for the transcode
    pub audio_quality: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            yt_dlp_path: PathBuf::from("yt-dlp"),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from the environment, the optional config
    /// file, and CLI overrides
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .with_context(|| format!("{TOKEN_ENV} not found; set the environment variable"))?;

        let mut downloader = Self::load_downloader(cli.config.as_deref())?;
        if let Some(dir) = &cli.download_dir {
            downloader.download_dir = dir.clone();
        }

        Ok(Self { token, downloader })
    }

    fn load_downloader(explicit: Option<&Path>) -> Result<DownloaderConfig> {
        if let Some(path) = explicit {
            let content = fs_err::read_to_string(path).context("Failed to read config file")?;
            return serde_yaml::from_str(&content).context("Failed to parse config file");
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => {
                let content =
                    fs_err::read_to_string(&path).context("Failed to read config file")?;
                serde_yaml::from_str(&content).context("Failed to parse config file")
            }
            _ => Ok(DownloaderConfig::default()),
        }
    }

    /// Get configuration file path
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tunefetch").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_target_mp3_at_192k() {
        let config = DownloaderConfig::default();
        assert_eq!(config.audio_format, "mp3");
        assert_eq!(config.audio_quality, "192K");
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.yt_dlp_path, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "download_dir: /tmp/songs").unwrap();

        let config = Config::load_downloader(Some(file.path())).unwrap();
        assert_eq!(config.download_dir, PathBuf::from("/tmp/songs"));
        assert_eq!(config.audio_format, "mp3");
        assert_eq!(config.audio_quality, "192K");
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let result = Config::load_downloader(Some(Path::new("/nonexistent/tunefetch.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "download_dir: [not, a, path").unwrap();

        assert!(Config::load_downloader(Some(file.path())).is_err());
    }
}
