//! Time-window selection over a loaded audio track

use crate::error::SelectionError;
use crate::timecode::{format_time, parse_time, TimeSpec};
use std::fmt;
use tracing::debug;

/// A half-open `[start, end)` range in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Start offset in whole milliseconds
    pub fn start_ms(&self) -> u64 {
        (self.start * 1000.0).round() as u64
    }

    /// End offset in whole milliseconds
    pub fn end_ms(&self) -> u64 {
        (self.end * 1000.0).round() as u64
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = format_time(self.start).unwrap_or_else(|_| self.start.to_string());
        let end = format_time(self.end).unwrap_or_else(|_| self.end.to_string());
        write!(f, "{} - {}", start, end)
    }
}

/// The selected window of a track with a fixed duration.
///
/// Invariant: `0 <= start < end <= duration` after every call. A rejected
/// mutation leaves the previous window in place.
#[derive(Debug, Clone)]
pub struct Selection {
    duration: f64,
    window: TimeWindow,
}

impl Selection {
    /// Select the whole track.
    pub fn new(duration: f64) -> Result<Self, SelectionError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SelectionError::InvalidDuration(duration));
        }
        Ok(Self {
            duration,
            window: TimeWindow { start: 0.0, end: duration },
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Replace the window with absolute start and end times.
    pub fn set_range(
        &mut self,
        start: impl Into<TimeSpec>,
        end: impl Into<TimeSpec>,
    ) -> Result<TimeWindow, SelectionError> {
        let start = parse_time(&start.into(), false)?;
        let end = parse_time(&end.into(), false)?;
        self.commit(start, end)
    }

    /// Shift the window edges by signed offsets.
    pub fn adjust_range(
        &mut self,
        start_offset: impl Into<TimeSpec>,
        end_offset: impl Into<TimeSpec>,
    ) -> Result<TimeWindow, SelectionError> {
        let start_offset = parse_time(&start_offset.into(), true)?;
        let end_offset = parse_time(&end_offset.into(), true)?;

        let start = round_ms(self.window.start + start_offset);
        let mut end = round_ms(self.window.end + end_offset);
        // The track end is rarely a whole millisecond.
        if (end - self.duration).abs() <= HALF_MS {
            end = self.duration;
        }
        self.set_range(start, end)
    }

    fn commit(&mut self, start: f64, end: f64) -> Result<TimeWindow, SelectionError> {
        if start < 0.0 || end > self.duration || start >= end {
            return Err(SelectionError::OutOfBounds {
                start,
                end,
                duration: self.duration,
            });
        }

        self.window = TimeWindow { start, end };
        debug!("Selected window {}", self.window);
        Ok(self.window)
    }
}

const HALF_MS: f64 = 0.0005;

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
