use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub mod locate;
pub mod ytdlp;

use crate::DownloadError;

/// Metadata the fetch tool reports for a downloaded track
#[derive(Debug, Clone, Deserialize)]
pub struct TrackMetadata {
    /// Track title, used for the attachment label
    pub title: Option<String>,

    /// Duration in seconds, used only for display text
    pub duration: Option<f64>,
}

/// Shape of the fetch tool's JSON report: either a single track or a
/// search-result page carrying an `entries` list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FetchResult {
    Search { entries: Vec<TrackMetadata> },
    Single(TrackMetadata),
}

impl FetchResult {
    /// First entry of a search page, or the single track itself
    pub fn into_track(self) -> Result<TrackMetadata, DownloadError> {
        match self {
            FetchResult::Single(track) => Ok(track),
            FetchResult::Search { mut entries } => {
                if entries.is_empty() {
                    Err(DownloadError::Tool("search returned no results".to_string()))
                } else {
                    Ok(entries.remove(0))
                }
            }
        }
    }
}

/// Trait for driving the external fetch/transcode tool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Resolve `query`, download the best audio stream, and transcode it,
    /// writing to `output_template` (a yt-dlp-style template ending in
    /// `.%(ext)s`). Returns the track metadata on success.
    async fn fetch(
        &self,
        query: &str,
        output_template: &Path,
    ) -> Result<TrackMetadata, DownloadError>;
}

/// A successfully downloaded and located track
#[derive(Debug)]
pub struct DownloadedTrack {
    pub path: PathBuf,
    pub title: String,
    pub duration: Option<f64>,
}

/// Per-request temp-file basename. Chat and message ids are unique per
/// request, so concurrent requests never collide on an output path.
pub fn temp_basename(chat_id: i64, message_id: i32) -> String {
    format!("{chat_id}_{message_id}")
}

/// Owns every file a request may leave in the working directory and
/// removes them when dropped, on success and failure alike. Partial
/// downloads (`.part` files) are swept along with the final artifact.
#[derive(Debug)]
pub struct RequestScope {
    dir: PathBuf,
    base: String,
}

impl RequestScope {
    pub fn new(dir: &Path, base: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            base: base.to_string(),
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        let entries = match fs_err::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !locate::belongs_to_request(name, &self.base) {
                continue;
            }
            match fs_err::remove_file(entry.path()) {
                Ok(()) => tracing::info!("removed temp file {}", entry.path().display()),
                Err(err) => {
                    tracing::warn!("failed to remove temp file {}: {err}", entry.path().display())
                }
            }
        }
    }
}

/// Fetch + locate as one fallible operation. No messaging concerns here,
/// which keeps the pipeline testable against a mocked fetcher.
pub async fn download_track(
    fetcher: &dyn AudioFetcher,
    dir: &Path,
    base: &str,
    query: &str,
    ext: &str,
) -> Result<DownloadedTrack, DownloadError> {
    let template = dir.join(format!("{base}.%(ext)s"));
    let metadata = fetcher.fetch(query, &template).await?;

    let path = locate::locate_output(dir, base, ext)?;

    Ok(DownloadedTrack {
        path,
        title: metadata.title.unwrap_or_else(|| "audio".to_string()),
        duration: metadata.duration,
    })
}
