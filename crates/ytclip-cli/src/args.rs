use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytclip")]
#[command(author, version, about = "Cut, preview and export a clip from a video's audio track")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video URL or local media file (shorthand for `edit <SOURCE>`)
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactively select, preview and save a clip
    Edit {
        /// Video URL or local media file
        source: String,
    },

    /// Cut a clip in one go, without prompts
    Clip {
        /// Video URL or local media file
        source: String,

        #[command(flatten)]
        options: ClipOptions,
    },

    /// Check external tool dependencies
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ClipOptions {
    /// Start time, e.g. 1:30 or 1:30.5 (default: beginning)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time, e.g. 2:45 or 2:45,5 (default: end of track)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Volume adjustment in dB, positive or negative
    #[arg(short, long, allow_hyphen_values = true)]
    pub gain: Option<f64>,

    /// Output file; the extension picks the format (mp3, wav, ogg, m4a)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Play the selection before saving
    #[arg(short, long)]
    pub preview: bool,
}
