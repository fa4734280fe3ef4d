//! Deck builder: configuration, assets and the build/serialize lifecycle.
//!
//! A [`Deck`] exists only while slides are being added. Saving consumes it
//! and yields a [`SavedDeck`], so a serialized deck cannot be mutated or
//! written a second time.

use std::path::{Path, PathBuf};

use deck_core::{Picture, Presentation, Result, Slide};
use deck_pptx::PptxWriter;

use crate::slides;

/// Where the deck is written and where optional assets are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    pub output: PathBuf,
    pub flowchart: PathBuf,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("Project_Presentation.pptx"),
            flowchart: PathBuf::from("flowchart.png"),
        }
    }
}

/// Optional external inputs, resolved before assembly starts.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub flowchart: Option<Picture>,
}

impl Assets {
    /// Probe for the flowchart image. An absent file is not an error; a
    /// present but unreadable or undecodable one is.
    pub fn load(config: &DeckConfig) -> Result<Self> {
        let flowchart = if config.flowchart.exists() {
            let data = std::fs::read(&config.flowchart)?;
            let description = config
                .flowchart
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(Picture::from_bytes(data, description)?)
        } else {
            log::debug!(
                "{} not found, architecture slide has no diagram",
                config.flowchart.display()
            );
            None
        };
        Ok(Self { flowchart })
    }
}

/// A deck under construction.
#[derive(Debug, Default)]
pub struct Deck {
    presentation: Presentation,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank slide.
    pub fn add_slide(&mut self) -> &mut Slide {
        self.presentation.add_slide()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn set_title(&mut self, title: &str) {
        self.presentation.title = Some(title.to_string());
    }

    /// Serialize to `path`, ending the deck's lifetime.
    pub fn save(self, path: &Path) -> Result<SavedDeck> {
        PptxWriter::new().save(&self.presentation, path)?;
        Ok(SavedDeck {
            path: path.to_path_buf(),
            slide_count: self.presentation.slide_count(),
        })
    }
}

/// A deck that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDeck {
    pub path: PathBuf,
    pub slide_count: usize,
}

/// Assemble every slide in narrative order.
pub fn assemble(assets: &Assets) -> Deck {
    let mut deck = Deck::new();
    deck.set_title(slides::DECK_TITLE);
    slides::assemble(&mut deck, assets);
    log::debug!("Assembled {} slides", deck.presentation().slide_count());
    deck
}

/// Load assets, assemble the deck and write it to `config.output`.
pub fn build_deck(config: &DeckConfig) -> Result<SavedDeck> {
    let assets = Assets::load(config)?;
    assemble(&assets).save(&config.output)
}
