use anyhow::Result;
use std::path::Path;
use ytclip_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytclip configuration\n");
    print!("{}", config.to_toml()?);

    println!("\nResolved:");
    println!("  temp root = {}", config.temp_dir().display());
    for (name, path) in [
        ("yt_dlp", config.yt_dlp_path()),
        ("ffmpeg", config.ffmpeg_path()),
        ("ffplay", config.ffplay_path()),
    ] {
        match path {
            Ok(p) => println!("  {} = {}", name, p.display()),
            Err(_) => println!("  {} = (not found)", name),
        }
    }

    // Later sources override earlier ones
    println!("\nConfig sources (lowest to highest priority):");
    println!("  1. Built-in defaults");
    if let Some(p) = Config::default_path() {
        println!("  2. {}", p.display());
    }
    if let Some(p) = config_path {
        println!("  3. {} (specified)", p.display());
    }
    println!("  4. Environment variables (YTCLIP_*, e.g. YTCLIP_TEMP__CLEANUP=false)");

    Ok(())
}
