use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use ytclip_core::config::Config;
use ytclip_core::error::ConfigError;

struct Tool {
    name: &'static str,
    version_arg: &'static str,
    needed_for: &'static str,
    install_hint: &'static str,
}

const TOOLS: [Tool; 3] = [
    Tool {
        name: "yt-dlp",
        version_arg: "--version",
        needed_for: "downloading from URLs",
        install_hint: "pip install yt-dlp",
    },
    Tool {
        name: "ffmpeg",
        version_arg: "-version",
        needed_for: "decoding and exporting",
        install_hint: "brew install ffmpeg / apt install ffmpeg",
    },
    Tool {
        name: "ffplay",
        version_arg: "-version",
        needed_for: "previews",
        install_hint: "ships with most ffmpeg builds",
    },
];

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytclip dependency check\n");

    let mut all_ok = true;
    for tool in &TOOLS {
        print!("{:<8} ", format!("{}:", tool.name));
        match locate(&config, tool.name) {
            Ok(path) => match version(&path, tool.version_arg) {
                Some(v) => println!("OK ({})", v),
                None => {
                    println!("FOUND at {} but failed to get version", path.display());
                    all_ok = false;
                }
            },
            Err(_) => {
                println!("NOT FOUND (needed for {})", tool.needed_for);
                println!("         Install with: {}", tool.install_hint);
                all_ok = false;
            }
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

fn locate(config: &Config, name: &str) -> Result<PathBuf, ConfigError> {
    match name {
        "yt-dlp" => config.yt_dlp_path(),
        "ffmpeg" => config.ffmpeg_path(),
        _ => config.ffplay_path(),
    }
}

fn version(path: &Path, arg: &str) -> Option<String> {
    let out = Command::new(path).arg(arg).output().ok()?;
    if !out.status.success() {
        return None;
    }
    parse_version(&String::from_utf8_lossy(&out.stdout))
}

/// First line of `--version` output; ffmpeg-style banners keep only the version word.
fn parse_version(output: &str) -> Option<String> {
    let first_line = output.lines().next()?.trim();
    if first_line.is_empty() {
        return None;
    }
    if first_line.contains(" version ") {
        return first_line.split_whitespace().nth(2).map(str::to_string);
    }
    Some(first_line.to_string())
}
