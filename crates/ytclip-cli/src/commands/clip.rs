use anyhow::Result;
use std::path::Path;
use ytclip_core::config::Config;
use ytclip_core::session::Session;
use ytclip_core::timecode::TimeSpec;

use super::source;
use super::spinner;
use crate::args::ClipOptions;

pub async fn run(source: &str, options: &ClipOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let media = source::resolve(source, &config).await?;

    let path = media.path.clone();
    let options = options.clone();
    let saved = tokio::task::spawn_blocking(move || {
        let mut session = source::open_session(&path, &config)?;
        let result = cut(&mut session, &options, &config);
        session.close();
        result
    })
    .await??;

    drop(media);
    println!("Output: {}", saved.display());
    Ok(())
}

fn cut(session: &mut Session, options: &ClipOptions, config: &Config) -> Result<std::path::PathBuf> {
    let start = options
        .start
        .clone()
        .map(TimeSpec::Text)
        .unwrap_or(TimeSpec::Seconds(0.0));
    let end = options
        .end
        .clone()
        .map(TimeSpec::Text)
        .unwrap_or(TimeSpec::Seconds(session.duration()));
    let window = session.set_range(start, end)?;
    println!("Selected {}", window);

    if let Some(db) = options.gain {
        session.apply_gain(db)?;
    }

    if options.preview {
        println!("Playing preview...");
        session.preview()?;
    }

    let target = config.output_path(&options.output);
    let pb = spinner(format!("Saving {}...", target.display()))?;
    let saved = session.save(&target);
    pb.finish_and_clear();
    Ok(saved?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use ytclip_core::encoder::{OutputFormat, Transcode};
    use ytclip_core::error::{EncodeError, PlaybackError};
    use ytclip_core::player::Player;
    use ytclip_core::scratch::ScratchArea;
    use ytclip_core::{AudioBuffer, TimeWindow};

    struct SilentPlayer;

    impl Player for SilentPlayer {
        fn play(&self, _path: &Path) -> std::result::Result<(), PlaybackError> {
            Ok(())
        }
    }

    struct CopyTranscoder;

    impl Transcode for CopyTranscoder {
        fn encode(
            &self,
            input: &Path,
            output: &Path,
            _format: OutputFormat,
        ) -> std::result::Result<(), EncodeError> {
            fs::copy(input, output)?;
            Ok(())
        }
    }

    fn session(root: &Path) -> Session {
        let buffer = AudioBuffer::new(vec![0.5; 60 * 10], 1, 10).unwrap();
        Session::with_backends(
            buffer,
            ScratchArea::create(root).unwrap(),
            Box::new(SilentPlayer),
            Box::new(CopyTranscoder),
        )
        .unwrap()
    }

    fn options(output: &Path) -> ClipOptions {
        ClipOptions {
            start: None,
            end: None,
            gain: None,
            output: output.to_path_buf(),
            preview: false,
        }
    }

    #[test]
    fn test_defaults_to_whole_track() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut session = session(root.path());
        let target = out.path().join("all.ogg");

        cut(&mut session, &options(&target), &Config::default()).unwrap();

        assert_eq!(session.window(), TimeWindow { start: 0.0, end: 60.0 });
        assert!(target.is_file());
    }

    #[test]
    fn test_range_gain_and_preview() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut session = session(root.path());
        let target = out.path().join("part.wav");

        let mut opts = options(&target);
        opts.start = Some("0:10".to_string());
        opts.end = Some("0:20,5".to_string());
        opts.gain = Some(-6.0);
        opts.preview = true;

        cut(&mut session, &opts, &Config::default()).unwrap();

        assert_eq!(session.window(), TimeWindow { start: 10.0, end: 20.5 });
        assert_eq!(session.scratch().previews().len(), 1);
        let written = AudioBuffer::load_wav(&target).unwrap();
        assert_eq!(written.num_frames(), 105);
    }

    #[test]
    fn test_invalid_range_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut session = session(root.path());

        let mut opts = options(&out.path().join("x.mp3"));
        opts.end = Some("5:00".to_string());

        let err = cut(&mut session, &opts, &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid time range"));
    }
}
