//! Layout primitives: reusable shape groups placed on a slide.
//!
//! Each primitive appends shapes to a slide and styles their text through
//! the style engine. Primitives that stack repeating blocks take a
//! [`Cursor`] and return the advanced cursor instead of mutating shared
//! state, so placing a list is a fold over its items.

use crate::shapes::{AutoShape, Geometry, Outline, Picture, Shape, Table};
use crate::style::{apply_paragraph_style, Style, StyleOutcome};
use crate::text::{Alignment, Paragraph, TextFrame};
use crate::theme;
use crate::types::Slide;
use crate::units::{Length, Rect, Rgb};

/// Vertical offset of the next auto-placed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    top: Length,
}

impl Cursor {
    pub fn at(top: Length) -> Self {
        Self { top }
    }

    pub fn inches(top: f64) -> Self {
        Self::at(Length::inches(top))
    }

    pub fn top(self) -> Length {
        self.top
    }

    /// The cursor moved down by `pitch`.
    pub fn advance(self, pitch: Length) -> Self {
        Self {
            top: self.top + pitch,
        }
    }
}

/// Distance between consecutive heading/body blocks.
const BLOCK_PITCH: f64 = 1.6;

/// Distance between consecutive cards.
const CARD_PITCH: f64 = 1.5;

/// Replace the paragraph's text and style it.
pub fn fill_paragraph(paragraph: &mut Paragraph, text: &str, style: &Style) -> StyleOutcome {
    paragraph.set_text(text);
    apply_paragraph_style(paragraph, style)
}

/// Append a styled paragraph to `frame`.
pub fn add_paragraph(
    frame: &mut TextFrame,
    text: &str,
    style: &Style,
    space_before: Option<Length>,
) -> StyleOutcome {
    let paragraph = frame.add_paragraph();
    paragraph.space_before = space_before;
    fill_paragraph(paragraph, text, style)
}

/// Append one `• item` paragraph per entry.
pub fn bullet_list(frame: &mut TextFrame, items: &[&str], style: &Style, space_before: Length) {
    for item in items {
        add_paragraph(frame, &format!("• {}", item), style, Some(space_before));
    }
}

/// A text box holding a single styled paragraph.
pub fn caption(slide: &mut Slide, bounds: Rect, text: &str, style: &Style) {
    let mut frame = TextFrame::for_text_box();
    fill_paragraph(frame.first_paragraph_mut(), text, style);
    slide.push(Shape::text_box(bounds, frame));
}

/// A text box whose frame is filled in by `build`.
pub fn text_box(slide: &mut Slide, bounds: Rect, word_wrap: bool, build: impl FnOnce(&mut TextFrame)) {
    let mut frame = TextFrame::for_text_box();
    if word_wrap {
        frame.word_wrap = Some(true);
    }
    build(&mut frame);
    slide.push(Shape::text_box(bounds, frame));
}

/// A filled rectangle holding paragraphs written by `build`.
///
/// The text is anchored like any new autoshape; `build` may override the
/// anchor, insets or alignment.
pub fn panel(
    slide: &mut Slide,
    bounds: Rect,
    fill: Rgb,
    outline: Outline,
    build: impl FnOnce(&mut TextFrame),
) {
    let mut shape = AutoShape::new(Geometry::Rectangle)
        .with_fill(fill)
        .with_outline(outline);
    build(&mut shape.text);
    slide.push(Shape::auto_shape(bounds, shape));
}

/// Accent bar on the left edge plus the slide title next to it.
pub fn title_strip(slide: &mut Slide, text: &str) {
    let bar = AutoShape::new(Geometry::Rectangle)
        .with_fill(theme::PRIMARY)
        .with_outline(Outline::Hidden);
    slide.push(Shape::auto_shape(Rect::inches(0.0, 0.4, 0.2, 0.8), bar));

    caption(
        slide,
        Rect::inches(0.4, 0.3, 9.5, 1.0),
        text,
        &Style::new(28.0, true, Some(theme::PRIMARY)),
    );
}

/// Divider line, left caption and an optional right-aligned page number.
pub fn footer(slide: &mut Slide, text: &str, page: Option<u32>) {
    let rule = AutoShape::new(Geometry::Rectangle)
        .with_fill(theme::RULE)
        .with_outline(Outline::Hidden);
    slide.push(Shape::auto_shape(Rect::inches(0.5, 7.0, 9.0, 0.02), rule));

    let style = Style::new(10.0, false, Some(theme::TEXT_FAINT));
    caption(slide, Rect::inches(0.5, 7.1, 5.0, 0.4), text, &style);

    if let Some(page) = page {
        let mut frame = TextFrame::for_text_box();
        let paragraph = frame.first_paragraph_mut();
        paragraph.alignment = Some(Alignment::Right);
        fill_paragraph(paragraph, &page.to_string(), &style);
        slide.push(Shape::text_box(Rect::inches(9.0, 7.1, 0.5, 0.4), frame));
    }
}

/// Heading/body pairs stacked from `cursor`, each with an accent bar.
///
/// Creates one heading box and one body box per pair and returns the
/// cursor below the last pair. An empty list adds nothing.
pub fn bulleted_blocks(slide: &mut Slide, items: &[(&str, &str)], cursor: Cursor) -> Cursor {
    let heading_style = Style::new(16.0, true, Some(theme::BLACK));
    let body_style = Style::new(14.0, false, Some(theme::TEXT_MUTED));

    items.iter().fold(cursor, |cursor, (heading, body)| {
        let top = cursor.top();

        let bar = AutoShape::new(Geometry::Rectangle)
            .with_fill(theme::ACCENT)
            .with_outline(Outline::Hidden);
        let bar_bounds = Rect::new(
            Length::inches(0.8),
            top,
            Length::inches(0.15),
            Length::inches(0.6),
        );
        slide.push(Shape::auto_shape(bar_bounds, bar));

        let heading_bounds = Rect::new(
            Length::inches(1.1),
            top - Length::inches(0.1),
            Length::inches(8.5),
            Length::inches(0.4),
        );
        caption(slide, heading_bounds, heading, &heading_style);

        let mut frame = TextFrame::for_text_box();
        frame.word_wrap = Some(true);
        fill_paragraph(frame.first_paragraph_mut(), body, &body_style);
        let body_bounds = Rect::new(
            Length::inches(1.1),
            top + Length::inches(0.35),
            Length::inches(8.5),
            Length::inches(0.8),
        );
        slide.push(Shape::text_box(body_bounds, frame));

        cursor.advance(Length::inches(BLOCK_PITCH))
    })
}

/// A bordered card with a title, a description and an outcome line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub outcome: &'a str,
}

/// Cards stacked from `cursor`; returns the cursor below the last card.
pub fn card_stack(slide: &mut Slide, cards: &[Card<'_>], cursor: Cursor) -> Cursor {
    cards.iter().fold(cursor, |cursor, card| {
        let mut shape = AutoShape::new(Geometry::Rectangle)
            .with_fill(theme::CARD_FILL)
            .with_outline(Outline::Solid {
                color: theme::CARD_BORDER,
                width: None,
            });
        shape.text.inset_top = Some(Length::inches(0.1));
        shape.text.inset_left = Some(Length::inches(0.2));

        fill_paragraph(
            shape.text.first_paragraph_mut(),
            card.title,
            &Style::new(14.0, true, Some(theme::PRIMARY)),
        );
        add_paragraph(
            &mut shape.text,
            card.description,
            &Style::new(12.0, false, Some(theme::TEXT_MUTED)),
            None,
        );
        add_paragraph(
            &mut shape.text,
            card.outcome,
            &Style::new(12.0, true, Some(theme::HIGHLIGHT)),
            Some(Length::points(3.0)),
        );

        let bounds = Rect::new(
            Length::inches(0.8),
            cursor.top(),
            Length::inches(8.5),
            Length::inches(1.3),
        );
        slide.push(Shape::auto_shape(bounds, shape));
        cursor.advance(Length::inches(CARD_PITCH))
    })
}

/// Before/after code panels joined by a right arrow, starting at `top`.
pub fn comparison_panel(slide: &mut Slide, before: &str, after: &str, top: Length) {
    let top = top.as_inches();
    let code = Style::new(12.0, false, Some(theme::BLACK)).with_family(theme::CODE_FONT);

    let mut left = AutoShape::new(Geometry::Rectangle)
        .with_fill(theme::PANEL_NEUTRAL)
        .with_outline(Outline::Solid {
            color: theme::RULE,
            width: None,
        });
    left.text.inset_left = Some(Length::inches(0.1));
    left.text.inset_top = Some(Length::inches(0.1));
    fill_paragraph(left.text.first_paragraph_mut(), before, &code);
    slide.push(Shape::auto_shape(Rect::inches(0.8, top, 3.8, 3.0), left));

    let arrow = AutoShape::new(Geometry::RightArrow)
        .with_fill(theme::ACCENT)
        .with_outline(Outline::Hidden);
    slide.push(Shape::auto_shape(Rect::inches(4.8, top + 1.3, 0.6, 0.4), arrow));

    let mut right = AutoShape::new(Geometry::Rectangle)
        .with_fill(theme::PANEL_ACCENT)
        .with_outline(Outline::Solid {
            color: theme::ACCENT,
            width: None,
        });
    right.text.inset_left = Some(Length::inches(0.1));
    right.text.inset_top = Some(Length::inches(0.1));
    right.text.word_wrap = Some(true);
    fill_paragraph(right.text.first_paragraph_mut(), after, &code);
    slide.push(Shape::auto_shape(Rect::inches(5.6, top, 3.8, 3.0), right));
}

/// A white box with a thick border and one centered, bold line.
pub fn formula_box(slide: &mut Slide, bounds: Rect, text: &str) {
    let mut shape = AutoShape::new(Geometry::Rectangle)
        .with_fill(theme::WHITE)
        .with_outline(Outline::Solid {
            color: theme::PRIMARY,
            width: Some(Length::points(2.0)),
        });
    let paragraph = shape.text.first_paragraph_mut();
    paragraph.alignment = Some(Alignment::Center);
    fill_paragraph(paragraph, text, &Style::new(20.0, true, Some(theme::BLACK)));
    slide.push(Shape::auto_shape(bounds, shape));
}

/// A table with a themed header row and centered data rows.
///
/// The grid is `rows.len() + 1` by `N`. With no headers or no data rows
/// nothing is placed.
pub fn data_table<const N: usize>(
    slide: &mut Slide,
    bounds: Rect,
    headers: &[&str; N],
    rows: &[[&str; N]],
) {
    if N == 0 || rows.is_empty() {
        return;
    }

    let mut table = Table::new(rows.len() + 1, N, bounds.width, bounds.height);
    let header_style = Style::new(12.0, true, Some(theme::WHITE));
    let body_style = Style::new(12.0, false, Some(theme::BLACK));

    let header_cells = std::iter::once((0, headers));
    let body_cells = rows.iter().enumerate().map(|(idx, row)| (idx + 1, row));

    for (row_idx, values) in header_cells.chain(body_cells) {
        let style = if row_idx == 0 { &header_style } else { &body_style };
        for (col_idx, value) in values.iter().enumerate() {
            if let Some(cell) = table.cell_mut(row_idx, col_idx) {
                if row_idx == 0 {
                    cell.fill = Some(theme::PRIMARY);
                }
                let paragraph = cell.text.first_paragraph_mut();
                paragraph.alignment = Some(Alignment::Center);
                fill_paragraph(paragraph, value, style);
            }
        }
    }

    slide.push(Shape::table(bounds, table));
}

/// Embed `picture` at (`left`, `top`), `width` wide, keeping its aspect ratio.
pub fn picture(slide: &mut Slide, picture: Picture, left: Length, top: Length, width: Length) {
    let height = picture.height_for_width(width);
    slide.push(Shape::picture(Rect::new(left, top, width, height), picture));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::tiny_png;
    use crate::shapes::ShapeKind;

    fn text_boxes(slide: &Slide) -> Vec<&Shape> {
        slide.shapes().iter().filter(|s| s.is_text_box()).collect()
    }

    #[test]
    fn test_bulleted_blocks_create_two_text_boxes_per_item() {
        let mut slide = Slide::new(1);
        let items = [("当前痛点", "a"), ("现有挑战", "b"), ("项目目标", "c")];

        let end = bulleted_blocks(&mut slide, &items, Cursor::inches(1.6));

        let boxes = text_boxes(&slide);
        assert_eq!(boxes.len(), 6);
        let pitch = Length::inches(BLOCK_PITCH);
        assert_eq!(end, Cursor::inches(1.6).advance(pitch).advance(pitch).advance(pitch));
        for pair in boxes.windows(2) {
            assert!(pair[0].bounds.y < pair[1].bounds.y);
            assert!(!pair[0].bounds.overlaps_vertically(&pair[1].bounds));
        }
    }

    #[test]
    fn test_bulleted_blocks_style_heading_and_body() {
        let mut slide = Slide::new(1);
        bulleted_blocks(&mut slide, &[("标题", "正文")], Cursor::inches(1.0));

        let boxes = text_boxes(&slide);
        let heading = &boxes[0].text_frame().unwrap().paragraphs()[0];
        let body_frame = boxes[1].text_frame().unwrap();
        assert_eq!(heading.defaults.bold, Some(true));
        assert_eq!(body_frame.paragraphs()[0].defaults.bold, Some(false));
        assert_eq!(body_frame.word_wrap, Some(true));
    }

    #[test]
    fn test_empty_lists_place_nothing() {
        let mut slide = Slide::new(1);
        let start = Cursor::inches(2.2);

        assert_eq!(bulleted_blocks(&mut slide, &[], start), start);
        assert_eq!(card_stack(&mut slide, &[], start), start);
        data_table::<4>(&mut slide, Rect::inches(0.5, 1.8, 9.0, 2.2), &["a"; 4], &[]);
        data_table::<0>(&mut slide, Rect::inches(0.5, 1.8, 9.0, 2.2), &[], &[[]]);

        assert_eq!(slide.shape_count(), 0);
    }

    #[test]
    fn test_data_table_dimensions_and_styles() {
        let mut slide = Slide::new(1);
        let headers = ["h1", "h2", "h3"];
        let rows = [["a", "b", "c"], ["d", "e", "f"]];

        data_table(&mut slide, Rect::inches(0.5, 1.8, 9.0, 2.2), &headers, &rows);

        assert_eq!(slide.shape_count(), 1);
        let table = slide.shapes()[0].as_table().unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        for c in 0..3 {
            let header = table.cell(0, c).unwrap();
            assert_eq!(header.fill, Some(theme::PRIMARY));
            let p = &header.text.paragraphs()[0];
            assert_eq!(p.defaults.bold, Some(true));
            assert_eq!(p.defaults.color, Some(theme::WHITE));
        }
        for r in 1..3 {
            for c in 0..3 {
                let cell = table.cell(r, c).unwrap();
                assert_eq!(cell.fill, None);
                let p = &cell.text.paragraphs()[0];
                assert_eq!(p.defaults.bold, Some(false));
                assert_eq!(p.alignment, Some(Alignment::Center));
            }
        }
        assert_eq!(table.cell(2, 1).unwrap().text.text(), "e");
    }

    #[test]
    fn test_title_strip_and_footer() {
        let mut slide = Slide::new(2);
        title_strip(&mut slide, "项目背景与意义");
        footer(&mut slide, theme::FOOTER_CAPTION, Some(1));
        assert_eq!(slide.shape_count(), 5);
        assert_eq!(
            slide.texts(),
            vec!["项目背景与意义", theme::FOOTER_CAPTION, "1"]
        );

        let page = slide.shapes()[4].text_frame().unwrap();
        assert_eq!(page.paragraphs()[0].alignment, Some(Alignment::Right));
    }

    #[test]
    fn test_footer_without_page_number() {
        let mut slide = Slide::new(1);
        footer(&mut slide, "caption", None);
        assert_eq!(slide.shape_count(), 2);
    }

    #[test]
    fn test_comparison_panel_encodes_before_and_after() {
        let mut slide = Slide::new(1);
        comparison_panel(&mut slide, "int a = 10;", "int a = ;", Length::inches(2.2));

        let fills: Vec<Option<Rgb>> = slide
            .shapes()
            .iter()
            .map(|s| match &s.kind {
                ShapeKind::AutoShape(shape) => shape.fill,
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                Some(theme::PANEL_NEUTRAL),
                Some(theme::ACCENT),
                Some(theme::PANEL_ACCENT)
            ]
        );
        match &slide.shapes()[1].kind {
            ShapeKind::AutoShape(arrow) => assert_eq!(arrow.geometry, Geometry::RightArrow),
            other => panic!("expected arrow, got {:?}", other),
        }
        let code = &slide.shapes()[0].text_frame().unwrap().paragraphs()[0];
        assert_eq!(code.defaults.latin.as_deref(), Some(theme::CODE_FONT));
    }

    #[test]
    fn test_formula_box_is_bordered_and_centered() {
        let mut slide = Slide::new(1);
        formula_box(&mut slide, Rect::inches(1.5, 2.0, 7.0, 1.5), "A · B");
        match &slide.shapes()[0].kind {
            ShapeKind::AutoShape(shape) => {
                assert_eq!(
                    shape.outline,
                    Outline::Solid {
                        color: theme::PRIMARY,
                        width: Some(Length::points(2.0))
                    }
                );
                let p = &shape.text.paragraphs()[0];
                assert_eq!(p.alignment, Some(Alignment::Center));
                assert_eq!(p.defaults.bold, Some(true));
            }
            other => panic!("expected autoshape, got {:?}", other),
        }
    }

    #[test]
    fn test_card_stack_advances_per_card() {
        let mut slide = Slide::new(1);
        let card = Card {
            title: "Group 1",
            description: "desc",
            outcome: "目标结果: 预期：100%",
        };
        let end = card_stack(&mut slide, &[card, card], Cursor::inches(2.2));
        assert_eq!(slide.shape_count(), 2);
        let pitch = Length::inches(CARD_PITCH);
        assert_eq!(end, Cursor::inches(2.2).advance(pitch).advance(pitch));
        assert!(!slide.shapes()[0]
            .bounds
            .overlaps_vertically(&slide.shapes()[1].bounds));
        assert_eq!(
            slide.shapes()[0].text_frame().unwrap().paragraphs().len(),
            3
        );
    }

    #[test]
    fn test_picture_keeps_aspect_ratio() {
        let mut slide = Slide::new(1);
        let png = Picture::from_bytes(tiny_png(), "flowchart.png").unwrap();
        picture(
            &mut slide,
            png,
            Length::inches(0.5),
            Length::inches(1.5),
            Length::inches(6.0),
        );
        assert_eq!(slide.shapes()[0].bounds.height, Length::inches(3.0));
    }

    #[test]
    fn test_text_box_wraps_on_request() {
        let mut slide = Slide::new(1);
        text_box(&mut slide, Rect::inches(0.8, 1.3, 8.5, 0.8), true, |frame| {
            fill_paragraph(frame.first_paragraph_mut(), "策略", &Style::new(16.0, false, None));
            bullet_list(frame, &["a", "b"], &Style::new(14.0, false, None), Length::points(8.0));
        });
        text_box(&mut slide, Rect::inches(0.8, 2.3, 8.5, 0.8), false, |_| {});

        let wrapped = slide.shapes()[0].text_frame().unwrap();
        assert_eq!(wrapped.word_wrap, Some(true));
        assert_eq!(wrapped.text(), "策略\n• a\n• b");
        assert_eq!(wrapped.paragraphs()[2].space_before, Some(Length::points(8.0)));
        assert_eq!(slide.shapes()[1].text_frame().unwrap().word_wrap, Some(false));
    }

    #[test]
    fn test_panel_is_filled_rectangle_with_text() {
        let mut slide = Slide::new(1);
        panel(
            &mut slide,
            Rect::inches(4.8, 1.8, 4.7, 2.5),
            theme::TERMINAL,
            Outline::Theme,
            |frame| {
                frame.inset_left = Some(Length::inches(0.1));
                fill_paragraph(frame.first_paragraph_mut(), "> run", &Style::new(12.0, true, None));
            },
        );

        match &slide.shapes()[0].kind {
            ShapeKind::AutoShape(shape) => {
                assert_eq!(shape.geometry, Geometry::Rectangle);
                assert_eq!(shape.fill, Some(theme::TERMINAL));
                assert_eq!(shape.outline, Outline::Theme);
                assert_eq!(shape.text.inset_left, Some(Length::inches(0.1)));
                assert_eq!(shape.text.text(), "> run");
            }
            other => panic!("expected autoshape, got {:?}", other),
        }
    }

    #[test]
    fn test_fill_paragraph_reports_degraded_typeface() {
        let mut frame = TextFrame::for_text_box();
        let applied = fill_paragraph(
            frame.first_paragraph_mut(),
            "项目总结",
            &Style::new(18.0, true, Some(theme::PRIMARY)),
        );
        assert_eq!(applied, StyleOutcome::Applied);

        let blank = Style::new(14.0, false, Some(theme::TEXT_BODY)).with_family("");
        let outcome = add_paragraph(&mut frame, "a\nb", &blank, None);
        assert!(outcome.is_degraded());
        let added = &frame.paragraphs()[1];
        assert_eq!(added.defaults.size, Some(1400));
        assert_eq!(added.defaults.latin, None);
        assert!(added.runs().all(|run| run.properties.east_asian.is_none()));
    }
}
