//! One editing session: a loaded track, its selection, and scratch space
//!
//! A session owns exactly one buffer, one window and one scratch area.
//! Callers must [`close`](Session::close) it on every exit path; dropping
//! an unclosed session still removes the scratch area, swallowing errors.

use crate::audio::AudioBuffer;
use crate::config::Config;
use crate::decoder::Decoder;
use crate::encoder::{Encoder, Transcode};
use crate::error::{PreviewError, Result};
use crate::exporter::Exporter;
use crate::gain::apply_gain;
use crate::player::{FfplayPlayer, Player};
use crate::preview::PreviewEngine;
use crate::scratch::ScratchArea;
use crate::selection::{Selection, TimeWindow};
use crate::timecode::TimeSpec;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct Session {
    buffer: AudioBuffer,
    selection: Selection,
    scratch: ScratchArea,
    preview: PreviewEngine,
    exporter: Exporter,
}

impl Session {
    /// Decode `media` and start a session with ffmpeg/ffplay backends.
    pub fn open(media: &Path, config: &Config) -> Result<Self> {
        let ffmpeg = config.ffmpeg_path()?;
        // Playback is optional; a missing ffplay only fails at preview time.
        let ffplay = config.ffplay_path().unwrap_or_else(|_| PathBuf::from("ffplay"));
        let scratch = ScratchArea::create(&config.temp_dir())?.keep_on_close(!config.temp.cleanup);

        info!("Loading audio from {}", media.display());
        let buffer = Decoder::new(ffmpeg.clone()).load(media, scratch.path())?;

        Self::with_backends(
            buffer,
            scratch,
            Box::new(FfplayPlayer::new(ffplay)),
            Box::new(Encoder::new(ffmpeg)),
        )
    }

    /// Start a session on an already decoded buffer.
    pub fn with_backends(
        buffer: AudioBuffer,
        scratch: ScratchArea,
        player: Box<dyn Player + Send>,
        encoder: Box<dyn Transcode + Send>,
    ) -> Result<Self> {
        let selection = Selection::new(buffer.duration_seconds())?;
        info!(
            "Loaded {:.3}s of audio ({} Hz, {} ch)",
            buffer.duration_seconds(),
            buffer.sample_rate(),
            buffer.channels()
        );

        let exporter = Exporter::new(encoder, scratch.root().to_path_buf());
        Ok(Self {
            buffer,
            selection,
            scratch,
            preview: PreviewEngine::new(player),
            exporter,
        })
    }

    pub fn duration(&self) -> f64 {
        self.selection.duration()
    }

    pub fn window(&self) -> TimeWindow {
        self.selection.window()
    }

    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    pub fn scratch(&self) -> &ScratchArea {
        &self.scratch
    }

    pub fn set_range(
        &mut self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
    ) -> Result<TimeWindow> {
        Ok(self.selection.set_range(start, end)?)
    }

    pub fn adjust_range(
        &mut self,
        start_offset: impl Into<TimeSpec>,
        end_offset: impl Into<TimeSpec>,
    ) -> Result<TimeWindow> {
        Ok(self.selection.adjust_range(start_offset, end_offset)?)
    }

    /// Play the current window, blocking until done.
    pub fn preview(&self) -> Result<PathBuf> {
        if self.scratch.is_closed() {
            return Err(PreviewError::Io(std::io::Error::other("session is closed")).into());
        }
        Ok(self
            .preview
            .render_and_play(&self.buffer, self.window(), &self.scratch)?)
    }

    /// Shift the whole track's volume by `decibels`.
    pub fn apply_gain(&mut self, decibels: f64) -> Result<()> {
        self.buffer = apply_gain(&self.buffer, decibels)?;
        Ok(())
    }

    /// Export the current window to `path`.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.exporter.save(&self.buffer, self.window(), path)?)
    }

    /// Release the scratch area. Idempotent and infallible.
    pub fn close(&mut self) {
        self.scratch.close();
    }
}
