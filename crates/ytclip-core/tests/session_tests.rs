//! Session lifecycle tests
//!
//! Drives a full select / preview / gain / save cycle on a generated WAV
//! with stand-in playback and encoding backends.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use tempfile::tempdir;
use ytclip_core::config::Config;
use ytclip_core::encoder::{OutputFormat, Transcode};
use ytclip_core::error::{EncodeError, ExportError, PlaybackError, SelectionError, TimeError};
use ytclip_core::player::Player;
use ytclip_core::scratch::ScratchArea;
use ytclip_core::{AudioBuffer, Session, TimeWindow, YtClipError};

#[derive(Clone, Default)]
struct RecordingPlayer {
    played: Arc<Mutex<Vec<PathBuf>>>,
}

impl Player for RecordingPlayer {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        assert!(path.exists(), "preview must exist while playing");
        self.played.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

struct CopyTranscoder;

impl Transcode for CopyTranscoder {
    fn encode(&self, input: &Path, output: &Path, _format: OutputFormat) -> Result<(), EncodeError> {
        fs::copy(input, output)?;
        Ok(())
    }
}

/// Ten minutes of mono audio at 100 Hz, constant amplitude 0.1
fn ten_minute_track() -> AudioBuffer {
    AudioBuffer::new(vec![0.1; 600 * 100], 1, 100).unwrap()
}

fn session_in(root: &Path) -> (Session, RecordingPlayer) {
    let player = RecordingPlayer::default();
    let scratch = ScratchArea::create(root).unwrap();
    let session = Session::with_backends(
        ten_minute_track(),
        scratch,
        Box::new(player.clone()),
        Box::new(CopyTranscoder),
    )
    .unwrap();
    (session, player)
}

#[test]
fn test_full_session() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let (mut session, player) = session_in(root.path());
    let scratch_path = session.scratch().path().to_path_buf();

    assert_eq!(session.window(), TimeWindow { start: 0.0, end: 600.0 });

    session.set_range("2:00", "8:00").unwrap();
    session.preview().unwrap();

    session.adjust_range("1:00", "-1:00").unwrap();
    assert_eq!(session.window(), TimeWindow { start: 180.0, end: 420.0 });
    session.preview().unwrap();

    assert_eq!(player.played.lock().unwrap().len(), 2);
    assert_eq!(session.scratch().previews().len(), 1);

    session.apply_gain(20.0).unwrap();
    let target = out.path().join("clips/final.mp3");
    session.save(&target).unwrap();

    let saved = AudioBuffer::load_wav(&target).unwrap();
    assert_eq!(saved.num_frames(), 240 * 100);
    assert_abs_diff_eq!(saved.raw_samples()[0], 1.0, epsilon = 1e-5);

    session.close();
    assert!(!scratch_path.exists());
    session.close();
}

#[test]
fn test_failed_mutations_keep_window() {
    let root = tempdir().unwrap();
    let (mut session, _) = session_in(root.path());
    session.set_range(30.0, 90.0).unwrap();

    let err = session.set_range("1:00", "0:30").unwrap_err();
    assert!(matches!(err, YtClipError::Selection(SelectionError::OutOfBounds { .. })));

    let err = session.set_range("-0:30", "1:00").unwrap_err();
    assert!(matches!(
        err,
        YtClipError::Selection(SelectionError::Time(TimeError::Negative))
    ));

    let err = session.adjust_range("0", "9:00").unwrap_err();
    assert!(matches!(err, YtClipError::Selection(_)));

    assert_eq!(session.window(), TimeWindow { start: 30.0, end: 90.0 });
}

#[test]
fn test_unsupported_export_format() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let (session, _) = session_in(root.path());

    let err = session.save(&out.path().join("out.invalidext")).unwrap_err();
    assert!(matches!(err, YtClipError::Export(ExportError::UnsupportedFormat { .. })));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_preview_after_close_fails() {
    let root = tempdir().unwrap();
    let (mut session, player) = session_in(root.path());
    session.close();

    assert!(matches!(session.preview(), Err(YtClipError::Preview(_))));
    assert!(player.played.lock().unwrap().is_empty());
}

#[test]
fn test_sessions_are_isolated() {
    let root = tempdir().unwrap();
    let (a, _) = session_in(root.path());
    let (b, _) = session_in(root.path());
    assert_ne!(a.scratch().path(), b.scratch().path());

    a.preview().unwrap();
    assert!(b.scratch().previews().is_empty());
}

#[test]
fn test_export_scratch_stays_under_temp_root() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    let (mut session, _) = session_in(root.path());
    session.set_range("0:10", "0:20").unwrap();
    session.close();

    // The intermediate WAV goes under the temp root, which outlives the scratch area.
    let target = out.path().join("clip.ogg");
    session.save(&target).unwrap();
    assert!(target.is_file());
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn test_open_wav_from_config() {
    let media_dir = tempdir().unwrap();
    let temp_root = tempdir().unwrap();
    let media = media_dir.path().join("track.wav");
    ten_minute_track().write_wav(&media).unwrap();

    let mut config = Config::default();
    config.paths.ffmpeg = Some(PathBuf::from("/nonexistent/ffmpeg"));
    config.paths.ffplay = Some(PathBuf::from("/nonexistent/ffplay"));
    config.temp.directory = Some(temp_root.path().to_path_buf());

    let mut session = Session::open(&media, &config).unwrap();
    assert_abs_diff_eq!(session.duration(), 600.0);
    assert!(session.scratch().path().starts_with(temp_root.path().join("ytclip")));

    // ffplay is missing, so the preview fails but the session stays usable.
    let err = session.preview().unwrap_err();
    assert!(err.to_string().starts_with("Failed to play preview"));
    session.set_range("1:00", "2:00").unwrap();

    session.close();
}
