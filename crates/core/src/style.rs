//! Style engine: applies font family, size, weight and color to paragraphs
//! and runs.
//!
//! Every application writes the requested family into both the Latin and
//! the East-Asian typeface slots of the properties container. Leaving the
//! East-Asian slot unset lets renderers fall back to a default face, which
//! garbles CJK text mixed with Latin text.
//!
//! Writing the typefaces is best-effort. When the family cannot be
//! expressed as a typeface the slots are left untouched, size, weight and
//! color are still applied, and the call reports [`StyleOutcome::Degraded`]
//! instead of failing.

use thiserror::Error;

use crate::text::{Paragraph, Run, TextProperties};
use crate::theme;
use crate::units::Rgb;

/// Requested character style.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub family: String,
    /// Size in points.
    pub size: f64,
    pub bold: bool,
    /// `None` keeps whatever color is already set.
    pub color: Option<Rgb>,
}

impl Style {
    /// A style in the deck's body font.
    pub fn new(size: f64, bold: bool, color: Option<Rgb>) -> Self {
        Self {
            family: theme::BODY_FONT.to_string(),
            size,
            bold,
            color,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Size in hundredths of a point.
    fn size_centipoints(&self) -> u32 {
        (self.size * 100.0).round() as u32
    }
}

/// Why the typeface slots of a container were not written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontSlotError {
    #[error("typeface name is empty")]
    EmptyTypeface,

    #[error("typeface name contains control character {0:?}")]
    ControlCharacter(char),
}

/// Result of a style application. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOutcome {
    /// Every container received the full style.
    Applied,
    /// Size, weight and color were applied, but the typeface slots of
    /// `skipped` containers were left as they were.
    Degraded {
        skipped: usize,
        reason: FontSlotError,
    },
}

impl StyleOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// What a style is applied to.
#[derive(Debug)]
pub enum StyleTarget<'a> {
    /// The paragraph default and every run already in the paragraph.
    Paragraph(&'a mut Paragraph),
    /// A single run.
    Run(&'a mut Run),
}

/// Apply `style` to a paragraph or a run.
pub fn apply_style(target: StyleTarget<'_>, style: &Style) -> StyleOutcome {
    match target {
        StyleTarget::Paragraph(paragraph) => apply_paragraph_style(paragraph, style),
        StyleTarget::Run(run) => apply_run_style(run, style),
    }
}

/// Set the paragraph default and restyle every run currently in it.
///
/// Runs added later only pick up the paragraph default, not a style that
/// was pushed onto earlier runs.
pub fn apply_paragraph_style(paragraph: &mut Paragraph, style: &Style) -> StyleOutcome {
    let mut failure = write_properties(&mut paragraph.defaults, style).err();
    let mut skipped = usize::from(failure.is_some());

    for run in paragraph.runs_mut() {
        if let Err(e) = write_properties(&mut run.properties, style) {
            skipped += 1;
            failure.get_or_insert(e);
        }
    }

    outcome(skipped, failure, style)
}

/// Style a single run.
pub fn apply_run_style(run: &mut Run, style: &Style) -> StyleOutcome {
    let failure = write_properties(&mut run.properties, style).err();
    outcome(usize::from(failure.is_some()), failure, style)
}

fn outcome(skipped: usize, failure: Option<FontSlotError>, style: &Style) -> StyleOutcome {
    match failure {
        None => StyleOutcome::Applied,
        Some(reason) => {
            log::warn!(
                "Skipped typeface slots on {} container(s) for font {:?}: {}",
                skipped,
                style.family,
                reason
            );
            StyleOutcome::Degraded { skipped, reason }
        }
    }
}

fn write_properties(props: &mut TextProperties, style: &Style) -> Result<(), FontSlotError> {
    props.size = Some(style.size_centipoints());
    props.bold = Some(style.bold);
    if let Some(color) = style.color {
        props.color = Some(color);
    }
    set_typefaces(props, &style.family)
}

/// Write `family` into both the Latin and East-Asian slots.
fn set_typefaces(props: &mut TextProperties, family: &str) -> Result<(), FontSlotError> {
    if family.trim().is_empty() {
        return Err(FontSlotError::EmptyTypeface);
    }
    if let Some(c) = family.chars().find(|c| c.is_control()) {
        return Err(FontSlotError::ControlCharacter(c));
    }
    props.latin = Some(family.to_string());
    props.east_asian = Some(family.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Run;

    fn dark_blue() -> Option<Rgb> {
        Some(Rgb::new(0, 51, 102))
    }

    #[test]
    fn test_paragraph_style_reaches_existing_runs() {
        let mut p = Paragraph::from_text("C语言代码\n相似度检测系统");
        let style = Style::new(36.0, true, dark_blue());

        let outcome = apply_paragraph_style(&mut p, &style);

        assert_eq!(outcome, StyleOutcome::Applied);
        assert_eq!(p.defaults.size, Some(3600));
        assert_eq!(p.defaults.bold, Some(true));
        assert_eq!(p.defaults.color, dark_blue());
        assert_eq!(p.runs().count(), 2);
        for run in p.runs() {
            assert_eq!(run.properties, p.defaults);
        }
    }

    #[test]
    fn test_both_typeface_slots_are_written() {
        let mut run = Run::new("int main ( ) { }");
        let style = Style::new(12.0, false, None).with_family(theme::CODE_FONT);

        assert_eq!(apply_run_style(&mut run, &style), StyleOutcome::Applied);
        assert_eq!(run.properties.latin.as_deref(), Some("Consolas"));
        assert_eq!(run.properties.east_asian.as_deref(), Some("Consolas"));
        assert_eq!(run.properties.bold, Some(false));
        assert_eq!(run.properties.color, None);
    }

    #[test]
    fn test_later_runs_do_not_inherit_restyle() {
        let mut p = Paragraph::from_text("first");
        let _ = apply_paragraph_style(&mut p, &Style::new(14.0, false, None));
        p.push_run(Run::new("second"));

        let runs: Vec<&Run> = p.runs().collect();
        assert_eq!(runs[0].properties.size, Some(1400));
        assert_eq!(runs[1].properties, TextProperties::default());
    }

    #[test]
    fn test_missing_color_keeps_previous_color() {
        let mut p = Paragraph::from_text("x");
        let _ = apply_paragraph_style(&mut p, &Style::new(14.0, false, dark_blue()));
        let _ = apply_paragraph_style(&mut p, &Style::new(10.0, true, None));
        assert_eq!(p.defaults.color, dark_blue());
        assert_eq!(p.defaults.size, Some(1000));
    }

    #[test]
    fn test_invalid_family_degrades_without_failing() {
        let mut p = Paragraph::from_text("a\nb");
        let style = Style::new(16.0, true, dark_blue()).with_family("  ");

        let outcome = apply_paragraph_style(&mut p, &style);

        assert_eq!(
            outcome,
            StyleOutcome::Degraded {
                skipped: 3,
                reason: FontSlotError::EmptyTypeface
            }
        );
        assert_eq!(p.defaults.size, Some(1600));
        assert_eq!(p.defaults.latin, None);
        assert!(p.runs().all(|r| r.properties.east_asian.is_none()));
        assert!(p.runs().all(|r| r.properties.bold == Some(true)));
    }

    #[test]
    fn test_degraded_run_keeps_earlier_typeface() {
        let mut run = Run::new("x");
        let _ = apply_run_style(&mut run, &Style::new(12.0, false, None));
        let outcome = apply_run_style(
            &mut run,
            &Style::new(12.0, false, None).with_family("Bad\u{7}Face"),
        );
        assert!(outcome.is_degraded());
        assert_eq!(run.properties.latin.as_deref(), Some(theme::BODY_FONT));
    }

    #[test]
    fn test_tagged_dispatch_matches_named_operations() {
        let style = Style::new(20.0, true, None);
        let mut a = Paragraph::from_text("Similarity");
        let mut b = a.clone();
        let _ = apply_style(StyleTarget::Paragraph(&mut a), &style);
        let _ = apply_paragraph_style(&mut b, &style);
        assert_eq!(a, b);
    }
}
