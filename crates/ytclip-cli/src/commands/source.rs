use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use ytclip_core::config::Config;
use ytclip_core::downloader::Downloader;
use ytclip_core::session::Session;

use super::{spinner, truncate};

/// A local media file, plus the download directory that holds it if any
pub struct MediaSource {
    pub path: PathBuf,
    pub title: String,
    download_dir: Option<TempDir>,
    keep: bool,
}

impl Drop for MediaSource {
    fn drop(&mut self) {
        if let Some(dir) = self.download_dir.take() {
            if self.keep {
                debug!("Download kept at: {}", dir.path().display());
                std::mem::forget(dir);
            }
        }
    }
}

fn looks_like_url(source: &str) -> bool {
    source.trim().contains("://")
}

/// Download `source` if it is a URL, otherwise check the local file exists.
pub async fn resolve(source: &str, config: &Config) -> Result<MediaSource> {
    if !looks_like_url(source) {
        let path = PathBuf::from(source);
        if !path.is_file() {
            bail!("No such media file: {}", path.display());
        }
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());
        return Ok(MediaSource {
            path,
            title,
            download_dir: None,
            keep: false,
        });
    }

    let root = config.temp_dir();
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create {}", root.display()))?;
    let download_dir = tempfile::Builder::new().prefix("download_").tempdir_in(&root)?;

    let yt_dlp = config.yt_dlp_path()?;
    let downloader = Downloader::new(yt_dlp, download_dir.path().to_path_buf());

    let pb = spinner(format!("Downloading {}", truncate(source, 50)))?;
    let result = match downloader.download(source).await {
        Ok(result) => result,
        Err(e) => {
            pb.abandon_with_message("Download failed");
            return Err(e.into());
        }
    };
    pb.finish_with_message(format!("Downloaded: {}", truncate(&result.metadata.title, 50)));

    Ok(MediaSource {
        path: result.audio_path,
        title: result.metadata.title,
        download_dir: Some(download_dir),
        keep: !config.temp.cleanup,
    })
}

/// Decode the media into a new session, with a spinner while it runs.
pub fn open_session(media: &Path, config: &Config) -> Result<Session> {
    let pb = spinner("Processing audio...")?;
    match Session::open(media, config) {
        Ok(session) => {
            pb.finish_and_clear();
            Ok(session)
        }
        Err(e) => {
            pb.abandon_with_message("Could not load audio");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://youtu.be/abc"));
        assert!(looks_like_url("HTTP://youtube.com/watch?v=abc"));
        assert!(looks_like_url("ftp://youtube.com/x"));
        assert!(!looks_like_url("clips/song.mp4"));
        assert!(!looks_like_url("C:\\music\\song.mp3"));
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let config = Config::default();
        let result = resolve("/nonexistent/media.mp4", &config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_local_file_is_used_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let media = resolve(path.to_str().unwrap(), &Config::default()).await.unwrap();
        assert_eq!(media.path, path);
        assert_eq!(media.title, "song.wav");
    }
}
