use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use ytclip_core::config::Config;
use ytclip_core::session::Session;
use ytclip_core::timecode::format_time;

use super::source;
use super::spinner;

pub async fn run(source: &str, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let media = source::resolve(source, &config).await?;

    let (path, title) = (media.path.clone(), media.title.clone());

    // Decoding, playback and prompts all block
    let result = tokio::task::spawn_blocking(move || {
        let mut session = source::open_session(&path, &config)?;
        let mut prompter = Prompter::new(io::stdin().lock());
        let result = edit_loop(&mut session, &mut prompter, &config, &title);
        session.close();
        result
    })
    .await?;

    drop(media);
    result
}

struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input closed");
        }
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }
}

fn edit_loop<R: BufRead>(
    session: &mut Session,
    prompter: &mut Prompter<R>,
    config: &Config,
    title: &str,
) -> Result<()> {
    println!(
        "Loaded: {} ({})",
        title,
        format_time(session.duration()).unwrap_or_default()
    );

    loop {
        let start = prompter.ask("Enter start time (e.g., 1:30 or 1:30.5): ")?;
        let end = prompter.ask("Enter end time (e.g., 2:45 or 2:45.5): ")?;
        match session.set_range(start, end) {
            Ok(_) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    loop {
        println!("\nPlaying preview ({})...", session.window());
        if let Err(e) = session.preview() {
            println!("Error: {}", e);
        }

        if !prompter.confirm("\nDo you want to adjust the time range? (y/n): ")? {
            break;
        }

        loop {
            let start = prompter.ask("Enter start time adjustment (e.g., 0:05 or -0:05): ")?;
            let end = prompter.ask("Enter end time adjustment (e.g., 0:05 or -0:05): ")?;
            match session.adjust_range(start, end) {
                Ok(window) => {
                    println!("New range: {}", window);
                    break;
                }
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    if prompter.confirm("\nDo you want to adjust volume? (y/n): ")? {
        loop {
            let answer = prompter.ask("Enter volume adjustment in dB (positive or negative): ")?;
            let applied = answer
                .replace(',', ".")
                .parse::<f64>()
                .context("Not a number")
                .and_then(|db| Ok(session.apply_gain(db)?));
            match applied {
                Ok(()) => break,
                Err(e) => println!("Error: {}", e),
            }
        }
    }

    loop {
        let answer = prompter.ask("\nEnter output file path (e.g., output.mp3): ")?;
        let target = config.output_path(&PathBuf::from(answer));

        let pb = spinner("Saving audio...")?;
        match session.save(&target) {
            Ok(saved) => {
                pb.finish_and_clear();
                println!("\nAudio saved to: {}", saved.display());
                return Ok(());
            }
            Err(e) => {
                pb.finish_and_clear();
                println!("Error: {}", e);
            }
        }
    }
}
