//! Error types for ytclip-core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtClipError>;

#[derive(Error, Debug)]
pub enum YtClipError {
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Gain(#[from] GainError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Time cannot be negative")]
    Negative,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Invalid time range: {0}")]
    Time(#[from] TimeError),

    #[error("Invalid time range: {start}s to {end}s does not fit within 0s to {duration}s")]
    OutOfBounds { start: f64, end: f64, duration: f64 },

    #[error("Invalid audio duration: {0}s")]
    InvalidDuration(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GainError {
    #[error("Invalid gain value: {0} dB")]
    NotFinite(f64),

    #[error("Gain out of range: {0:+.1} dB in total")]
    OutOfRange(f64),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to read WAV {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write WAV {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("Audio has no channels")]
    NoChannels,
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("No audio stream available")]
    NoAudioStream,

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("FFmpeg not found. Install ffmpeg or set paths.ffmpeg")]
    FfmpegNotFound,

    #[error("FFmpeg failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("FFmpeg not found")]
    FfmpegNotFound,

    #[error("FFmpeg encoding failed with exit code: {0:?}")]
    FfmpegFailed(Option<i32>),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("ffplay not found. Install ffmpeg or set paths.ffplay")]
    FfplayNotFound,

    #[error("ffplay failed with exit code: {0:?}")]
    FfplayFailed(Option<i32>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every preview failure, whatever the stage, surfaces as one of these.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Failed to play preview: {0}")]
    Render(#[from] AudioError),

    #[error("Failed to play preview: preview file {0} was not created")]
    Missing(PathBuf),

    #[error("Failed to play preview: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Failed to play preview: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format {extension:?}. Supported formats: {supported}")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("Invalid output directory path {path}: {source}")]
    InvalidDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save audio: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to save audio: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
