//! Blocking audio playback

use crate::error::PlaybackError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Plays an audio file, returning once playback has finished.
pub trait Player {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Playback through `ffplay` with no video window
#[derive(Debug)]
pub struct FfplayPlayer {
    ffplay_path: PathBuf,
}

impl FfplayPlayer {
    pub fn new(ffplay_path: PathBuf) -> Self {
        Self { ffplay_path }
    }
}

impl Player for FfplayPlayer {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        info!("Playing {}", path.display());

        let status = Command::new(&self.ffplay_path)
            .args(["-hide_banner", "-loglevel", "error", "-nodisp", "-autoexit"])
            .arg(path)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => PlaybackError::FfplayNotFound,
                _ => PlaybackError::Io(e),
            })?;

        if !status.success() {
            return Err(PlaybackError::FfplayFailed(status.code()));
        }

        debug!("Playback finished");
        Ok(())
    }
}
