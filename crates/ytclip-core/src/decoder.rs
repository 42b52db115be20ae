//! Audio decoder using FFmpeg

use crate::audio::AudioBuffer;
use crate::error::DecodeError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Decoder {
    ffmpeg_path: PathBuf,
}

impl Decoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Decode any media file's audio track into memory.
    ///
    /// WAV files are read directly; everything else goes through ffmpeg into
    /// a float WAV inside `workdir` first.
    pub fn load(&self, input: &Path, workdir: &Path) -> Result<AudioBuffer, DecodeError> {
        if is_wav(input) {
            if let Ok(buffer) = AudioBuffer::load_wav(input) {
                debug!("Read {} directly", input.display());
                return Ok(buffer);
            }
        }

        let decoded = workdir.join("decoded.wav");
        self.decode_to_wav(input, &decoded)?;
        let buffer = AudioBuffer::load_wav(&decoded)?;

        // The decoded copy is no longer needed once in memory.
        if let Err(e) = std::fs::remove_file(&decoded) {
            warn!("Could not remove {}: {}", decoded.display(), e);
        }
        Ok(buffer)
    }

    /// Decode audio to 32-bit float PCM WAV
    pub fn decode_to_wav(&self, input: &Path, output: &Path) -> Result<(), DecodeError> {
        info!("Decoding {} to WAV", input.display());

        let status = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(input)
            // Audio only, float samples at the source rate
            .args(["-vn", "-c:a", "pcm_f32le", "-f", "wav"])
            .arg("-y")
            .arg(output)
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DecodeError::FfmpegNotFound,
                _ => DecodeError::Io(e),
            })?;

        if !status.success() {
            return Err(DecodeError::FfmpegFailed(status.code()));
        }

        debug!("Decoded to: {}", output.display());
        Ok(())
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wav_loads_without_ffmpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.WAV");
        AudioBuffer::new(vec![0.1; 800], 1, 800)
            .unwrap()
            .write_wav(&path)
            .unwrap();

        let decoder = Decoder::new(PathBuf::from("/nonexistent/ffmpeg-binary"));
        let buffer = decoder.load(&path, dir.path()).unwrap();
        assert_eq!(buffer.num_frames(), 800);
        assert_eq!(buffer.duration_seconds(), 1.0);
    }

    #[test]
    fn test_other_formats_need_ffmpeg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("video.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let decoder = Decoder::new(PathBuf::from("/nonexistent/ffmpeg-binary"));
        let result = decoder.load(&path, dir.path());
        assert!(matches!(result, Err(DecodeError::FfmpegNotFound)));
    }

    #[cfg(unix)]
    #[test]
    fn test_decoded_copy_is_removed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let fixture = dir.path().join("fixture.wav");
        AudioBuffer::new(vec![0.25; 400], 2, 200)
            .unwrap()
            .write_wav(&fixture)
            .unwrap();

        // Stand-in ffmpeg: copy the fixture to the last argument
        let ffmpeg = dir.path().join("ffmpeg");
        std::fs::write(
            &ffmpeg,
            format!("#!/bin/sh\nfor last; do :; done\ncp '{}' \"$last\"\n", fixture.display()),
        )
        .unwrap();
        std::fs::set_permissions(&ffmpeg, std::fs::Permissions::from_mode(0o755)).unwrap();

        let media = dir.path().join("clip.mp4");
        std::fs::write(&media, b"video").unwrap();
        let workdir = dir.path().join("work");
        std::fs::create_dir(&workdir).unwrap();

        let buffer = Decoder::new(ffmpeg).load(&media, &workdir).unwrap();
        assert_eq!(buffer.num_frames(), 200);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(std::fs::read_dir(&workdir).unwrap().count(), 0);
    }
}
