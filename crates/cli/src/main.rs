//! Generates the code-similarity project presentation.

mod deck;
mod slides;

use anyhow::{Context, Result};
use clap::Parser;

use crate::deck::DeckConfig;

/// Build `Project_Presentation.pptx` in the current directory, embedding
/// `flowchart.png` when it exists.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = DeckConfig::default();
    let saved = deck::build_deck(&config)
        .with_context(|| format!("Failed to generate {}", config.output.display()))?;
    log::info!("Wrote {} slides to {}", saved.slide_count, saved.path.display());

    println!("Final refined presentation generated.");
    Ok(())
}
