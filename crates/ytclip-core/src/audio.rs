//! In-memory decoded audio
//!
//! Samples are interleaved `f32` shared behind an `Arc`, so replacing a
//! buffer (for a gain change) never copies or mutates the signal. Gain is
//! stored in decibels and applied when samples are rendered.

use crate::error::AudioError;
use crate::gain::db_to_linear;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Arc<[f32]>,
    channels: u16,
    sample_rate: u32,
    gain_db: f64,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::NoChannels);
        }
        Ok(Self {
            samples: samples.into(),
            channels,
            sample_rate,
            gain_db: 0.0,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / f64::from(self.sample_rate)
    }

    /// Accumulated gain in decibels
    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Same signal with `gain_db` replaced. Samples are shared.
    pub(crate) fn with_gain_db(&self, gain_db: f64) -> Self {
        Self {
            samples: Arc::clone(&self.samples),
            channels: self.channels,
            sample_rate: self.sample_rate,
            gain_db,
        }
    }

    /// Raw samples, before gain
    pub fn raw_samples(&self) -> &[f32] {
        &self.samples
    }

    /// Samples with the accumulated gain applied. No clamping.
    pub fn rendered_samples(&self) -> impl Iterator<Item = f32> + '_ {
        let factor = db_to_linear(self.gain_db) as f32;
        self.samples.iter().map(move |&s| s * factor)
    }

    fn frame_at_ms(&self, ms: u64) -> usize {
        let frame = ms as u128 * u128::from(self.sample_rate) / 1000;
        usize::try_from(frame).unwrap_or(usize::MAX).min(self.num_frames())
    }

    /// Copy out `[start_ms, end_ms)`, clamped to the buffer. Gain carries over.
    pub fn slice(&self, start_ms: u64, end_ms: u64) -> Self {
        let start = self.frame_at_ms(start_ms);
        let end = self.frame_at_ms(end_ms).max(start);
        let channels = self.channels as usize;

        Self {
            samples: self.samples[start * channels..end * channels].into(),
            channels: self.channels,
            sample_rate: self.sample_rate,
            gain_db: self.gain_db,
        }
    }

    /// Load a WAV file (any bit depth, int or float)
    pub fn load_wav(path: &Path) -> Result<Self, AudioError> {
        let read_err = |source| AudioError::Read {
            path: path.to_path_buf(),
            source,
        };

        let reader = WavReader::open(path).map_err(read_err)?;
        let spec = reader.spec();

        let samples = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()
                .map_err(read_err)?,
            SampleFormat::Int => {
                let max_val = (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<f32>, _>>()
                    .map_err(read_err)?
            }
        };

        Self::new(samples, spec.channels, spec.sample_rate)
    }

    /// Write as 32-bit float WAV with gain applied (lossless, unclamped)
    pub fn write_wav(&self, path: &Path) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        self.write_with(path, spec, |writer, sample| writer.write_sample(sample))
    }

    /// Write as 16-bit PCM WAV with gain applied. Out-of-range samples clip.
    pub fn write_wav_pcm16(&self, path: &Path) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        self.write_with(path, spec, |writer, sample| {
            let clipped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clipped * f32::from(i16::MAX)) as i16)
        })
    }

    fn write_with<F>(&self, path: &Path, spec: WavSpec, mut write: F) -> Result<(), AudioError>
    where
        F: FnMut(&mut WavWriter<std::io::BufWriter<std::fs::File>>, f32) -> hound::Result<()>,
    {
        let write_err = |source| AudioError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
        for sample in self.rendered_samples() {
            write(&mut writer, sample).map_err(write_err)?;
        }
        writer.finalize().map_err(write_err)
    }
}
