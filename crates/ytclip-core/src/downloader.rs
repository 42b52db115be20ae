//! Video audio downloader using yt-dlp

use crate::error::DownloadError;
use regex::Regex;
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Hosts accepted by [`validate_video_url`]
pub const VIDEO_HOSTS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

#[derive(Debug)]
pub struct Downloader {
    yt_dlp_path: PathBuf,
    temp_dir: PathBuf,
}

#[derive(Debug)]
pub struct DownloadResult {
    pub audio_path: PathBuf,
    pub metadata: VideoMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub ext: String,
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, temp_dir: PathBuf) -> Self {
        Self { yt_dlp_path, temp_dir }
    }

    /// Download the best audio stream of a video into the temp directory
    pub async fn download(&self, url: &str) -> Result<DownloadResult, DownloadError> {
        if !validate_video_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        info!("Downloading audio from: {}", url);

        let output_template = self.temp_dir.join("%(id)s.%(ext)s");

        let output = Command::new(&self.yt_dlp_path)
            .args([
                // Best audio-only stream, whatever the codec
                "-f", "bestaudio/best",
                "--no-playlist",
                "--no-progress",
                // Print JSON to stdout for metadata parsing
                "--print-json",
                "--no-overwrites",
            ])
            .arg("-o")
            .arg(&output_template)
            .arg(url)
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DownloadError::YtDlpNotFound,
                _ => DownloadError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);

            if stderr.contains("Video unavailable") || stderr.contains("Private video") {
                return Err(DownloadError::VideoUnavailable(url.to_string()));
            }
            if stderr.contains("is not a valid URL") {
                return Err(DownloadError::InvalidUrl(url.to_string()));
            }

            return Err(DownloadError::YtDlpFailed(output.status.code()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let metadata: VideoMetadata = serde_json::from_str(stdout.trim())
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        debug!("Downloaded: {} ({})", metadata.title, metadata.id);

        let audio_path = self.find_audio_file(&metadata)?;

        Ok(DownloadResult {
            audio_path,
            metadata,
        })
    }

    fn find_audio_file(&self, metadata: &VideoMetadata) -> Result<PathBuf, DownloadError> {
        let reported = (!metadata.ext.is_empty()).then_some(metadata.ext.as_str());
        let extensions = ["webm", "m4a", "opus", "mp4", "mp3", "ogg", "aac"];

        for ext in reported.into_iter().chain(extensions) {
            let path = self.temp_dir.join(format!("{}.{}", metadata.id, ext));
            if path.exists() {
                debug!("Found audio file: {}", path.display());
                return Ok(path);
            }
        }

        Err(DownloadError::NoAudioStream)
    }
}

/// Check that a URL uses http(s) and points at a known video host
pub fn validate_video_url(url: &str) -> bool {
    // scheme://host[:port][/path?query#fragment]
    let Ok(re) = Regex::new(r"^(?i)(https?)://([^/?#:@\s]+)(?::\d+)?(?:[/?#]\S*)?$") else {
        return false;
    };
    let Some(caps) = re.captures(url.trim()) else {
        return false;
    };
    let host = caps[2].to_ascii_lowercase();
    VIDEO_HOSTS.contains(&host.as_str())
}
