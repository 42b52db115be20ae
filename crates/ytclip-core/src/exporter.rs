//! Export the selected window to a user-chosen file

use crate::audio::AudioBuffer;
use crate::encoder::{OutputFormat, Transcode, SUPPORTED_FORMATS};
use crate::error::{EncodeError, ExportError};
use crate::selection::TimeWindow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Exporter {
    encoder: Box<dyn Transcode + Send>,
    workdir: PathBuf,
}

impl Exporter {
    /// `workdir` holds the intermediate WAV handed to the encoder.
    pub fn new(encoder: Box<dyn Transcode + Send>, workdir: PathBuf) -> Self {
        Self { encoder, workdir }
    }

    /// Write the window of `buffer` to `path`, format chosen by extension.
    ///
    /// Output is staged next to the target and renamed into place, so a
    /// failed write never leaves a partial file at `path`.
    pub fn save(
        &self,
        buffer: &AudioBuffer,
        window: TimeWindow,
        path: &Path,
    ) -> Result<PathBuf, ExportError> {
        let format = OutputFormat::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            supported: SUPPORTED_FORMATS.join(", "),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| ExportError::InvalidDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
                debug!("Created output directory {}", parent.display());
            }
        }

        info!("Saving {} as {} to {}", window, format, path.display());
        let slice = buffer.slice(window.start_ms(), window.end_ms());

        let staged = staging_path(path);
        let result = self
            .write(&slice, &staged, format)
            .and_then(|()| Ok(fs::rename(&staged, path)?));
        if let Err(e) = result {
            if staged.exists() {
                if let Err(cleanup) = fs::remove_file(&staged) {
                    warn!("Could not remove {}: {}", staged.display(), cleanup);
                }
            }
            return Err(e);
        }

        info!("Saved {}", path.display());
        Ok(path.to_path_buf())
    }

    fn write(&self, slice: &AudioBuffer, staged: &Path, format: OutputFormat) -> Result<(), ExportError> {
        if format == OutputFormat::Wav {
            slice.write_wav_pcm16(staged).map_err(EncodeError::from)?;
            return Ok(());
        }

        fs::create_dir_all(&self.workdir)?;
        let intermediate = tempfile::Builder::new()
            .prefix("ytclip-export-")
            .suffix(".wav")
            .tempfile_in(&self.workdir)?;
        slice.write_wav(intermediate.path()).map_err(EncodeError::from)?;
        self.encoder.encode(intermediate.path(), staged, format)?;
        Ok(())
    }
}

/// Hidden sibling of `path` with a unique name
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = format!(".{}.{}.part", name, uuid::Uuid::new_v4().simple());
    path.with_file_name(staged)
}
