//! PPTX (Office Open XML) backend for slide decks.
//!
//! Serializes a [`deck_core::Presentation`] into a `.pptx` ZIP package and
//! reads written packages back into a plain summary.

mod drawing;
pub mod inspect;
mod parts;
mod writer;
mod xml;

pub use inspect::{read_summary, DeckSummary, ShapeSummary, SlideSummary, SummaryKind};
pub use writer::PptxWriter;
