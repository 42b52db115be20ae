//! ytclip-core: select, preview and export a clip of a video's audio track

pub mod audio;
pub mod config;
pub mod decoder;
pub mod downloader;
pub mod encoder;
pub mod error;
pub mod exporter;
pub mod gain;
pub mod player;
pub mod preview;
pub mod scratch;
pub mod selection;
pub mod session;
pub mod timecode;

pub use audio::AudioBuffer;
pub use config::Config;
pub use encoder::OutputFormat;
pub use error::{Result, YtClipError};
pub use selection::{Selection, TimeWindow};
pub use session::Session;
pub use timecode::{format_time, parse_time, TimeSpec};
