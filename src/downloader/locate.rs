use std::path::{Path, PathBuf};

use crate::DownloadError;

/// Resolve the artifact produced for `base`.
///
/// The fetch tool does not report the final filename precisely (it may
/// append disambiguating text), so resolution tries the expected path
/// first and falls back to a scan of the working directory.
pub fn locate_output(dir: &Path, base: &str, ext: &str) -> Result<PathBuf, DownloadError> {
    let exact = dir.join(format!("{base}.{ext}"));
    if exact.exists() {
        return Ok(exact);
    }

    let suffix = format!(".{ext}");
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if belongs_to_request(name, base) && name.ends_with(&suffix) {
            matches.push(entry.path());
        }
    }

    // Sort so the pick is deterministic, not directory-order dependent
    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or_else(|| DownloadError::ArtifactNotFound(base.to_string()))
}

/// A directory entry belongs to a request when its name is the request
/// basename followed by `.` or `_`. The boundary check keeps basename
/// `7_4` from claiming files of request `7_42`.
pub(crate) fn belongs_to_request(name: &str, base: &str) -> bool {
    match name.strip_prefix(base) {
        Some(rest) => rest.starts_with('.') || rest.starts_with('_'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("42_1.mp3"), b"audio").unwrap();
        fs_err::write(dir.path().join("42_1_Title.mp3"), b"audio").unwrap();

        let path = locate_output(dir.path(), "42_1", "mp3").unwrap();
        assert_eq!(path, dir.path().join("42_1.mp3"));
    }

    #[test]
    fn falls_back_to_prefix_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("42_2_Some Title.mp3"), b"audio").unwrap();

        let path = locate_output(dir.path(), "42_2", "mp3").unwrap();
        assert_eq!(path, dir.path().join("42_2_Some Title.mp3"));
    }

    #[test]
    fn scan_pick_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("42_3_Beta.mp3"), b"audio").unwrap();
        fs_err::write(dir.path().join("42_3_Alpha.mp3"), b"audio").unwrap();

        let path = locate_output(dir.path(), "42_3", "mp3").unwrap();
        assert_eq!(path, dir.path().join("42_3_Alpha.mp3"));
    }

    #[test]
    fn scan_ignores_other_requests_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        // Same prefix characters but a different request
        fs_err::write(dir.path().join("42_45.mp3"), b"audio").unwrap();
        // Right request, wrong extension
        fs_err::write(dir.path().join("42_4.webm"), b"video").unwrap();
        // Partial download
        fs_err::write(dir.path().join("42_4.mp3.part"), b"partial").unwrap();

        let err = locate_output(dir.path(), "42_4", "mp3").unwrap_err();
        assert!(matches!(err, DownloadError::ArtifactNotFound(_)));
    }

    #[test]
    fn empty_directory_is_artifact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_output(dir.path(), "42_5", "mp3").unwrap_err();
        assert!(matches!(err, DownloadError::ArtifactNotFound(_)));
        assert!(err.to_string().contains("42_5"));
    }

    #[test]
    fn request_membership_requires_a_boundary() {
        assert!(belongs_to_request("7_4.mp3", "7_4"));
        assert!(belongs_to_request("7_4_Title.mp3", "7_4"));
        assert!(belongs_to_request("7_4.mp3.part", "7_4"));
        assert!(!belongs_to_request("7_42.mp3", "7_4"));
        assert!(!belongs_to_request("7_4", "7_4"));
        assert!(!belongs_to_request("unrelated.mp3", "7_4"));
    }
}
