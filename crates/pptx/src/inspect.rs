//! Read-back summary of a written package.
//!
//! Walks the slides in presentation order and records, per top-level
//! shape, its kind, its text and (for tables) the cell grid. Used to check
//! generated decks without a presentation application.

use std::io::{Read, Seek};

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::parts::{PRESENTATION_RELS_PART, REL_SLIDE};

/// What a top-level slide element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// `p:sp`: autoshape or text box.
    Shape,
    Picture,
    /// `p:graphicFrame` holding a table.
    Table,
}

/// One top-level shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSummary {
    pub kind: SummaryKind,
    /// Paragraphs joined by `\n`; line breaks also read as `\n`.
    pub text: String,
    /// Cell text, row by row. Empty unless `kind` is `Table`.
    pub rows: Vec<Vec<String>>,
}

impl ShapeSummary {
    fn new(kind: SummaryKind) -> Self {
        Self {
            kind,
            text: String::new(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSummary {
    /// 1-based position in the presentation.
    pub number: usize,
    /// Part name inside the package, e.g. `ppt/slides/slide1.xml`.
    pub part: String,
    pub shapes: Vec<ShapeSummary>,
}

impl SlideSummary {
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Non-empty shape texts in z-order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn tables(&self) -> Vec<&[Vec<String>]> {
        self.shapes
            .iter()
            .filter(|s| s.kind == SummaryKind::Table)
            .map(|s| s.rows.as_slice())
            .collect()
    }

    pub fn count(&self, kind: SummaryKind) -> usize {
        self.shapes.iter().filter(|s| s.kind == kind).count()
    }

    /// Whether any shape's text contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.shapes.iter().any(|s| s.text.contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Summarize the package read from `reader`.
pub fn read_summary<R: Read + Seek>(reader: R) -> Result<DeckSummary> {
    let mut archive =
        ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

    let slide_order = slide_order(&mut archive)?;
    let mut summary = DeckSummary::default();
    for (idx, part) in slide_order.into_iter().enumerate() {
        let content = read_part(&mut archive, &part)?;
        let shapes = scan_slide(&content)?;
        log::debug!("{}: {} shapes", part, shapes.len());
        summary.slides.push(SlideSummary {
            number: idx + 1,
            part,
            shapes,
        });
    }
    Ok(summary)
}

/// Slide part names ordered by their relationship ids.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let rels = read_part(archive, PRESENTATION_RELS_PART)?;
    let mut slides: Vec<(String, Option<usize>)> = Vec::new();

    let mut reader = Reader::from_str(&rels);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let id = attribute(e, b"Id");
                let rel_type = attribute(e, b"Type");
                let target = attribute(e, b"Target");
                if rel_type != REL_SLIDE {
                    continue;
                }
                let order = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                let path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("ppt/{}", target),
                };
                slides.push((path, order));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    Ok(slides.into_iter().map(|(path, _)| path).collect())
}

/// Text collection state for one slide.
#[derive(Default)]
struct SlideScan {
    shapes: Vec<ShapeSummary>,
    current: Option<ShapeSummary>,
    shape_paragraphs: usize,
    row: Option<Vec<String>>,
    cell: Option<String>,
    cell_paragraphs: usize,
    in_text: bool,
}

impl SlideScan {
    /// Where text currently goes: the open cell, else the open shape.
    fn target(&mut self) -> Option<&mut String> {
        match (&mut self.cell, &mut self.current) {
            (Some(cell), _) => Some(cell),
            (None, Some(shape)) => Some(&mut shape.text),
            (None, None) => None,
        }
    }

    fn start_paragraph(&mut self) {
        let seen = if self.cell.is_some() {
            &mut self.cell_paragraphs
        } else {
            &mut self.shape_paragraphs
        };
        let needs_newline = *seen > 0;
        *seen += 1;
        if needs_newline {
            if let Some(target) = self.target() {
                target.push('\n');
            }
        }
    }

    fn open_shape(&mut self, kind: SummaryKind) {
        if self.current.is_none() {
            self.current = Some(ShapeSummary::new(kind));
            self.shape_paragraphs = 0;
        }
    }

    fn close_shape(&mut self) {
        if let Some(shape) = self.current.take() {
            self.shapes.push(shape);
        }
    }
}

fn shape_kind(name: &[u8]) -> Option<SummaryKind> {
    match name {
        b"sp" => Some(SummaryKind::Shape),
        b"pic" => Some(SummaryKind::Picture),
        b"graphicFrame" => Some(SummaryKind::Table),
        _ => None,
    }
}

/// Collect the top-level shapes of one slide part.
fn scan_slide(xml: &str) -> Result<Vec<ShapeSummary>> {
    let mut reader = Reader::from_str(xml);
    // Whitespace inside <a:t> is content.
    reader.trim_text(false);
    let mut scan = SlideScan::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if let Some(kind) = shape_kind(local) {
                    scan.open_shape(kind);
                    continue;
                }
                match local {
                    b"tr" => scan.row = Some(Vec::new()),
                    b"tc" => {
                        scan.cell = Some(String::new());
                        scan.cell_paragraphs = 0;
                    }
                    b"p" => scan.start_paragraph(),
                    b"t" => scan.in_text = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => scan.start_paragraph(),
                b"br" => {
                    if let Some(target) = scan.target() {
                        target.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if scan.in_text {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Bad text content: {}", e)))?;
                    if let Some(target) = scan.target() {
                        target.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if shape_kind(local).is_some() {
                    scan.close_shape();
                    continue;
                }
                match local {
                    b"t" => scan.in_text = false,
                    b"tc" => {
                        if let (Some(cell), Some(row)) = (scan.cell.take(), scan.row.as_mut()) {
                            row.push(cell);
                        }
                    }
                    b"tr" => {
                        if let (Some(row), Some(shape)) = (scan.row.take(), scan.current.as_mut()) {
                            shape.rows.push(row);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(scan.shapes)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::InvalidPackage(format!("Part not found '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> String {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
        .unwrap_or_default()
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PptxWriter;
    use deck_core::layout::{self, Card, Cursor};
    use deck_core::{theme, Presentation};
    use std::io::Cursor as IoCursor;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_scan_joins_paragraphs_and_breaks() {
        let xml = concat!(
            r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>"#,
            r#"<p:sp><p:txBody><a:bodyPr/>"#,
            r#"<a:p><a:r><a:t>one</a:t></a:r><a:br/><a:r><a:t> two</a:t></a:r></a:p>"#,
            r#"<a:p><a:r><a:t>a &amp; b</a:t></a:r></a:p>"#,
            r#"</p:txBody></p:sp>"#,
            r#"<p:pic><p:nvPicPr/></p:pic>"#,
            r#"</p:spTree></p:cSld></p:sld>"#
        );
        let shapes = scan_slide(xml).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].kind, SummaryKind::Shape);
        assert_eq!(shapes[0].text, "one\n two\na & b");
        assert_eq!(shapes[1].kind, SummaryKind::Picture);
        assert!(shapes[1].text.is_empty());
    }

    #[test]
    fn test_scan_rejects_malformed_xml() {
        assert!(scan_slide("<p:sld><p:sp></p:pic></p:sld>").is_err());
    }

    #[test]
    fn test_summary_of_written_deck() {
        let mut pres = Presentation::new();
        let slide = pres.add_slide();
        layout::title_strip(slide, "实验结果分析");
        layout::data_table(
            slide,
            deck_core::Rect::inches(0.5, 1.8, 9.0, 2.2),
            &["组", "得分"],
            &[["Group 1", "1.0000"], ["Group 3", "0.5824"]],
        );
        let slide = pres.add_slide();
        let end = layout::card_stack(
            slide,
            &[Card {
                title: "Group 1",
                description: "注释",
                outcome: "目标结果: 预期：100%",
            }],
            Cursor::inches(2.2),
        );
        assert_eq!(end, Cursor::inches(2.2).advance(deck_core::Length::inches(1.5)));
        layout::footer(slide, theme::FOOTER_CAPTION, Some(6));

        let bytes = PptxWriter::new()
            .write(&pres, IoCursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let summary = read_summary(IoCursor::new(bytes)).unwrap();

        assert_eq!(summary.slide_count(), 2);
        let first = &summary.slides[0];
        assert_eq!(first.part, "ppt/slides/slide1.xml");
        assert_eq!(first.shape_count(), 3);
        assert_eq!(
            first.tables(),
            vec![&[
                vec!["组".to_string(), "得分".to_string()],
                vec!["Group 1".to_string(), "1.0000".to_string()],
                vec!["Group 3".to_string(), "0.5824".to_string()],
            ][..]]
        );

        let second = &summary.slides[1];
        assert_eq!(second.shape_count(), 4);
        assert_eq!(second.texts()[0], "Group 1\n注释\n目标结果: 预期：100%");
        assert!(second.contains_text(theme::FOOTER_CAPTION));
        assert_eq!(second.texts().last(), Some(&"6"));
    }

    #[test]
    fn test_missing_rels_is_invalid_package() {
        let mut buffer = IoCursor::new(Vec::new());
        {
            let mut archive = zip::ZipWriter::new(&mut buffer);
            archive.start_file("hello.txt", zip::write::FileOptions::default())
                .unwrap();
            archive.finish().unwrap();
        }
        buffer.set_position(0);
        assert!(matches!(
            read_summary(buffer),
            Err(Error::InvalidPackage(_))
        ));
    }
}
