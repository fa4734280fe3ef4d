//! Text frames, paragraphs and runs.
//!
//! The model mirrors DrawingML: a [`TextFrame`] owns an ordered list of
//! [`Paragraph`]s, each paragraph owns runs and line breaks, and character
//! formatting lives in [`TextProperties`] containers (`a:rPr` on a run,
//! `a:defRPr` as the paragraph default).

use crate::units::{Length, Rgb};

/// Character formatting as it appears in the markup.
///
/// `None` means "not specified here"; the renderer falls back to inherited
/// values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProperties {
    /// Font size in hundredths of a point.
    pub size: Option<u32>,
    pub bold: Option<bool>,
    pub color: Option<Rgb>,
    /// Typeface used for Latin-script glyphs (`a:latin`).
    pub latin: Option<String>,
    /// Typeface used for East-Asian glyphs (`a:ea`).
    pub east_asian: Option<String>,
}

/// A contiguous span of text with its own formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    text: String,
    pub properties: TextProperties,
}

impl Run {
    /// Create an unformatted run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: TextProperties::default(),
        }
    }

    /// The run's text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Content of a paragraph in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(Run),
    /// Soft line break (`a:br`).
    Break,
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// One block of text with a default style and a sequence of runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub alignment: Option<Alignment>,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: Option<f64>,
    pub space_before: Option<Length>,
    /// Paragraph-level default formatting, applied to text without a
    /// run-level override.
    pub defaults: TextProperties,
    content: Vec<Inline>,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding `text`.
    pub fn from_text(text: &str) -> Self {
        let mut paragraph = Self::new();
        paragraph.set_text(text);
        paragraph
    }

    /// Replace the paragraph content with `text`.
    ///
    /// Each `\n` becomes a line break between two runs; empty segments
    /// produce no run.
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                self.content.push(Inline::Break);
            }
            if !line.is_empty() {
                self.content.push(Inline::Run(Run::new(line)));
            }
        }
    }

    /// Append a run.
    pub fn push_run(&mut self, run: Run) {
        self.content.push(Inline::Run(run));
    }

    /// Runs and breaks in order.
    pub fn content(&self) -> &[Inline] {
        &self.content
    }

    /// The runs, skipping breaks.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Break => None,
        })
    }

    /// Mutable access to the runs, skipping breaks.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Break => None,
        })
    }

    /// Plain text with breaks rendered as `\n`.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|inline| match inline {
                Inline::Run(run) => run.text(),
                Inline::Break => "\n",
            })
            .collect()
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Vertical anchoring of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

/// The text container of a text box, autoshape or table cell.
///
/// A frame always holds at least one paragraph; paragraphs are only ever
/// appended.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    /// `Some(true)` wraps at the frame edge, `Some(false)` never wraps.
    pub word_wrap: Option<bool>,
    /// Resize the shape to fit its text.
    pub auto_fit: bool,
    pub anchor: Option<Anchor>,
    pub inset_left: Option<Length>,
    pub inset_top: Option<Length>,
    paragraphs: Vec<Paragraph>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            word_wrap: None,
            auto_fit: false,
            anchor: None,
            inset_left: None,
            inset_top: None,
            paragraphs: vec![Paragraph::new()],
        }
    }
}

impl TextFrame {
    /// Create a frame with a single empty paragraph and no body settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame of a freshly inserted text box: no wrapping, grows with its text.
    pub fn for_text_box() -> Self {
        Self {
            word_wrap: Some(false),
            auto_fit: true,
            ..Self::default()
        }
    }

    /// Frame of a freshly inserted autoshape: text anchored at the middle
    /// and the first paragraph centered.
    pub fn for_auto_shape() -> Self {
        Self {
            anchor: Some(Anchor::Middle),
            paragraphs: vec![Paragraph::new().with_alignment(Alignment::Center)],
            ..Self::default()
        }
    }

    /// Paragraphs in top-to-bottom order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The first paragraph, which always exists.
    pub fn first_paragraph_mut(&mut self) -> &mut Paragraph {
        &mut self.paragraphs[0]
    }

    /// Append an empty paragraph and return it.
    pub fn add_paragraph(&mut self) -> &mut Paragraph {
        let idx = self.paragraphs.len();
        self.paragraphs.push(Paragraph::new());
        &mut self.paragraphs[idx]
    }

    /// All text, paragraphs joined by `\n`.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_splits_lines_into_runs_and_breaks() {
        let p = Paragraph::from_text("C语言代码\n相似度检测系统");
        assert_eq!(p.runs().count(), 2);
        assert_eq!(p.content().len(), 3);
        assert_eq!(p.content()[1], Inline::Break);
        assert_eq!(p.text(), "C语言代码\n相似度检测系统");
    }

    #[test]
    fn test_set_text_skips_empty_segments() {
        let p = Paragraph::from_text("\n[INFO] Reading files...");
        assert_eq!(p.runs().count(), 1);
        assert_eq!(p.content()[0], Inline::Break);
    }

    #[test]
    fn test_set_text_replaces_content() {
        let mut p = Paragraph::from_text("old");
        p.set_text("new");
        assert_eq!(p.text(), "new");
        assert_eq!(p.runs().count(), 1);
    }

    #[test]
    fn test_frame_always_has_a_paragraph() {
        let mut frame = TextFrame::new();
        assert_eq!(frame.paragraphs().len(), 1);
        frame.first_paragraph_mut().set_text("a");
        frame.add_paragraph().set_text("b");
        assert_eq!(frame.text(), "a\nb");
    }

    #[test]
    fn test_auto_shape_frame_centers_first_paragraph() {
        let mut frame = TextFrame::for_auto_shape();
        assert_eq!(frame.anchor, Some(Anchor::Middle));
        assert_eq!(frame.paragraphs()[0].alignment, Some(Alignment::Center));
        assert_eq!(frame.add_paragraph().alignment, None);
    }
}
