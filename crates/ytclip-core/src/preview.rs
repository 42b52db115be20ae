//! Render the selected window to a scratch file and play it

use crate::audio::AudioBuffer;
use crate::error::PreviewError;
use crate::player::Player;
use crate::scratch::{ScratchArea, PREVIEW_EXTENSION, PREVIEW_PREFIX};
use crate::selection::TimeWindow;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct PreviewEngine {
    player: Box<dyn Player + Send>,
}

impl PreviewEngine {
    pub fn new(player: Box<dyn Player + Send>) -> Self {
        Self { player }
    }

    /// Write the window to a new preview file, replacing older previews.
    pub fn render(
        &self,
        buffer: &AudioBuffer,
        window: TimeWindow,
        scratch: &ScratchArea,
    ) -> Result<PathBuf, PreviewError> {
        let slice = buffer.slice(window.start_ms(), window.end_ms());

        scratch.ensure()?;
        let timestamp = chrono::Utc::now().timestamp_millis();
        let preview_path = scratch
            .path()
            .join(format!("{}{}.{}", PREVIEW_PREFIX, timestamp, PREVIEW_EXTENSION));

        scratch.prune_previews();

        slice.write_wav(&preview_path)?;
        if !preview_path.exists() {
            return Err(PreviewError::Missing(preview_path));
        }

        debug!("Rendered preview: {}", preview_path.display());
        Ok(preview_path)
    }

    /// Render the window and block until playback finishes.
    pub fn render_and_play(
        &self,
        buffer: &AudioBuffer,
        window: TimeWindow,
        scratch: &ScratchArea,
    ) -> Result<PathBuf, PreviewError> {
        info!("Previewing {}", window);
        let preview_path = self.render(buffer, window, scratch)?;
        self.player.play(&preview_path)?;
        Ok(preview_path)
    }
}
