use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{AudioFetcher, FetchResult, TrackMetadata};
use crate::config::DownloaderConfig;
use crate::utils;
use crate::DownloadError;

/// Fetch/transcode driver around the yt-dlp binary
pub struct YtDlpFetcher {
    program: PathBuf,
    audio_format: String,
    audio_quality: String,
}

impl YtDlpFetcher {
    pub fn new(config: &DownloaderConfig) -> Self {
        Self {
            program: config.yt_dlp_path.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// One run both downloads and prints the metadata JSON. Playlist
    /// expansion stays off so a search never fans out.
    fn build_args(&self, query: &str, output_template: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--output".into(),
            output_template.as_os_str().to_owned(),
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.audio_format.clone().into(),
            "--audio-quality".into(),
            self.audio_quality.clone().into(),
            "--no-playlist".into(),
            "--print-json".into(),
            "--no-warnings".into(),
            "--quiet".into(),
        ];

        // Free text is a search term; direct links are fetched as-is
        if !utils::looks_like_url(query) {
            args.push("--default-search".into());
            args.push("ytsearch".into());
        }

        args.push(query.into());
        args
    }

    fn parse_metadata(stdout: &[u8]) -> Result<TrackMetadata, DownloadError> {
        let json = String::from_utf8_lossy(stdout);
        let result: FetchResult = serde_json::from_str(json.trim())
            .map_err(|err| DownloadError::Tool(format!("unparseable metadata output: {err}")))?;
        result.into_track()
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        query: &str,
        output_template: &Path,
    ) -> Result<TrackMetadata, DownloadError> {
        tracing::debug!("invoking {} for query: {query}", self.program.display());

        let output = Command::new(&self.program)
            .args(self.build_args(query, output_template))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::Tool(error.trim().to_string()));
        }

        Self::parse_metadata(&output.stdout)
    }
}
