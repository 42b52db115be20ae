//! Audio encoder using FFmpeg

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Extensions accepted for export, lowercase
pub const SUPPORTED_FORMATS: [&str; 4] = ["mp3", "wav", "ogg", "m4a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
            OutputFormat::Ogg => "ogg",
            OutputFormat::M4a => "m4a",
        }
    }

    /// Case-insensitive lookup by format token
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(OutputFormat::Mp3),
            "wav" => Some(OutputFormat::Wav),
            "ogg" => Some(OutputFormat::Ogg),
            "m4a" => Some(OutputFormat::M4a),
            _ => None,
        }
    }

    /// Format inferred from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// FFmpeg muxer name, so output names need not carry an extension
    fn muxer(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
            OutputFormat::Ogg => "ogg",
            OutputFormat::M4a => "ipod",
        }
    }

    fn codec_args(&self) -> &'static [&'static str] {
        match self {
            OutputFormat::Mp3 => &[
                "-c:a", "libmp3lame",
                "-q:a", "2", // VBR ~190 kbps
            ],
            OutputFormat::Wav => &["-c:a", "pcm_s16le"],
            OutputFormat::Ogg => &["-c:a", "libvorbis", "-q:a", "5"],
            OutputFormat::M4a => &["-c:a", "aac", "-b:a", "192k"],
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Mp3 => write!(f, "MP3"),
            OutputFormat::Wav => write!(f, "WAV"),
            OutputFormat::Ogg => write!(f, "Ogg Vorbis"),
            OutputFormat::M4a => write!(f, "AAC (M4A)"),
        }
    }
}

/// Converts a WAV file into one of the export containers.
pub trait Transcode {
    fn encode(&self, input: &Path, output: &Path, format: OutputFormat) -> Result<(), EncodeError>;
}

#[derive(Debug)]
pub struct Encoder {
    ffmpeg_path: PathBuf,
}

impl Encoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }
}

impl Transcode for Encoder {
    fn encode(&self, input: &Path, output: &Path, format: OutputFormat) -> Result<(), EncodeError> {
        info!("Encoding to {} format", format);

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error"]);
        cmd.arg("-i").arg(input);
        cmd.args(format.codec_args());
        cmd.args(["-f", format.muxer()]);
        cmd.arg("-y").arg(output);

        let status = cmd.status().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EncodeError::FfmpegNotFound,
            _ => EncodeError::Io(e),
        })?;

        if !status.success() {
            return Err(EncodeError::FfmpegFailed(status.code()));
        }

        debug!("Encoded to: {}", output.display());
        Ok(())
    }
}
