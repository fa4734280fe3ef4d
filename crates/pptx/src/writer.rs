//! PPTX package assembly.
//!
//! A package is a ZIP archive of XML parts tied together by relationship
//! parts and a content-type manifest. Every entry is stamped with the same
//! fixed timestamp, so equal presentations produce equal bytes.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use deck_core::{Error, ImageFormat, Presentation, Result, ShapeKind};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::drawing::{image_rel_id, slide_xml, LAYOUT_REL_ID};
use crate::parts::*;
use crate::xml::XmlBuilder;

/// `sldMasterId` values start above the 32-bit signed range.
const FIRST_MASTER_ID: &str = "2147483648";
/// `sldId` values start at 256.
const FIRST_SLIDE_ID: usize = 256;
const NS_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::ZipError(e.to_string())
}

/// One media part referenced by a slide.
struct Media {
    part: String,
    data: Vec<u8>,
}

/// Writer for `.pptx` packages.
pub struct PptxWriter {
    options: FileOptions,
}

impl PptxWriter {
    pub fn new() -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        Self { options }
    }

    /// Write `presentation` to a file, replacing any existing one.
    pub fn save(&self, presentation: &Presentation, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::debug!("Writing presentation to {}", path.display());
        let file = File::create(path)?;
        let mut sink = self.write(presentation, BufWriter::new(file))?;
        sink.flush()?;
        Ok(())
    }

    /// Write `presentation` as a package into `sink` and hand the sink back.
    pub fn write<W: Write + Seek>(&self, presentation: &Presentation, sink: W) -> Result<W> {
        let mut zip = ZipWriter::new(sink);
        let slides = presentation.slides();

        // Media numbering runs across the whole deck.
        let mut media_count = 0usize;
        let mut extensions = BTreeSet::new();
        let mut slide_media = Vec::with_capacity(slides.len());
        for slide in slides {
            let mut media = Vec::new();
            for picture in slide.shapes().iter().filter_map(|s| match &s.kind {
                ShapeKind::Picture(p) => Some(p),
                _ => None,
            }) {
                media_count += 1;
                let ext = picture.format().extension();
                extensions.insert(picture.format());
                media.push(Media {
                    part: format!("ppt/media/image{}.{}", media_count, ext),
                    data: picture.data().to_vec(),
                });
            }
            slide_media.push(media);
        }

        self.add_part(&mut zip, "[Content_Types].xml", &content_types_xml(slides.len(), &extensions)?)?;
        self.add_part(&mut zip, "_rels/.rels", &root_rels_xml()?)?;
        self.add_part(&mut zip, CORE_PROPERTIES_PART, &core_properties_xml(presentation)?)?;
        self.add_part(&mut zip, EXTENDED_PROPERTIES_PART, &extended_properties_xml(slides.len())?)?;
        self.add_part(&mut zip, PRESENTATION_PART, &presentation_xml(presentation)?)?;
        self.add_part(&mut zip, PRESENTATION_RELS_PART, &presentation_rels_xml(slides.len())?)?;
        self.add_part(&mut zip, SLIDE_MASTER_PART, SLIDE_MASTER_XML.as_bytes())?;
        self.add_part(&mut zip, SLIDE_MASTER_RELS_PART, &slide_master_rels_xml()?)?;
        self.add_part(&mut zip, SLIDE_LAYOUT_PART, SLIDE_LAYOUT_XML.as_bytes())?;
        self.add_part(&mut zip, SLIDE_LAYOUT_RELS_PART, &slide_layout_rels_xml()?)?;
        self.add_part(&mut zip, THEME_PART, THEME_XML.as_bytes())?;
        self.add_part(&mut zip, PRES_PROPS_PART, PRES_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, VIEW_PROPS_PART, VIEW_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, TABLE_STYLES_PART, TABLE_STYLES_XML.as_bytes())?;

        for (slide, media) in slides.iter().zip(&slide_media) {
            log::debug!(
                "Slide {}: {} shapes, {} pictures",
                slide.number,
                slide.shape_count(),
                media.len()
            );
            self.add_part(&mut zip, &slide_part(slide.number), &slide_xml(slide)?)?;
            self.add_part(&mut zip, &slide_rels_part(slide.number), &slide_rels_xml(media)?)?;
            for item in media {
                self.add_part(&mut zip, &item.part, &item.data)?;
            }
        }

        zip.finish().map_err(zip_error)
    }

    fn add_part<W: Write + Seek>(&self, zip: &mut ZipWriter<W>, name: &str, data: &[u8]) -> Result<()> {
        zip.start_file(name, self.options).map_err(zip_error)?;
        zip.write_all(data)?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn relationship(xml: &mut XmlBuilder, id: &str, rel_type: &str, target: &str) -> Result<()> {
    xml.empty("Relationship", &[("Id", id), ("Type", rel_type), ("Target", target)])
}

fn content_types_xml(slide_count: usize, images: &BTreeSet<ImageFormat>) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    for format in images {
        xml.empty(
            "Default",
            &[("Extension", format.extension()), ("ContentType", format.content_type())],
        )?;
    }

    let overrides = [
        (PRESENTATION_PART, CT_PRESENTATION),
        (SLIDE_MASTER_PART, CT_SLIDE_MASTER),
        (SLIDE_LAYOUT_PART, CT_SLIDE_LAYOUT),
        (THEME_PART, CT_THEME),
        (PRES_PROPS_PART, CT_PRES_PROPS),
        (VIEW_PROPS_PART, CT_VIEW_PROPS),
        (TABLE_STYLES_PART, CT_TABLE_STYLES),
        (CORE_PROPERTIES_PART, CT_CORE_PROPERTIES),
        (EXTENDED_PROPERTIES_PART, CT_EXTENDED_PROPERTIES),
    ];
    for (part, content_type) in overrides {
        let name = format!("/{}", part);
        xml.empty("Override", &[("PartName", &name), ("ContentType", content_type)])?;
    }
    for number in 1..=slide_count {
        let name = format!("/{}", slide_part(number));
        xml.empty("Override", &[("PartName", &name), ("ContentType", CT_SLIDE)])?;
    }
    xml.close("Types")?;
    Ok(xml.finish())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, "rId1", REL_OFFICE_DOCUMENT, PRESENTATION_PART)?;
    relationship(&mut xml, "rId2", REL_CORE_PROPERTIES, CORE_PROPERTIES_PART)?;
    relationship(&mut xml, "rId3", REL_EXTENDED_PROPERTIES, EXTENDED_PROPERTIES_PART)?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

/// Core properties carry no timestamps.
fn core_properties_xml(presentation: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("cp:coreProperties", &[("xmlns:cp", NS_CORE_PROPERTIES), ("xmlns:dc", NS_DC)])?;
    if let Some(title) = &presentation.title {
        xml.leaf("dc:title", title)?;
    }
    xml.leaf("cp:revision", "1")?;
    xml.close("cp:coreProperties")?;
    Ok(xml.finish())
}

fn extended_properties_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Properties", &[("xmlns", NS_EXTENDED_PROPERTIES)])?;
    xml.leaf("Application", env!("CARGO_PKG_NAME"))?;
    xml.leaf("Slides", &slide_count.to_string())?;
    xml.close("Properties")?;
    Ok(xml.finish())
}

fn presentation_xml(presentation: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_RELS),
            ("xmlns:p", NS_MAIN),
            ("saveSubsetFonts", "1"),
        ],
    )?;
    xml.open("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", FIRST_MASTER_ID), ("r:id", "rId1")])?;
    xml.close("p:sldMasterIdLst")?;

    if presentation.slide_count() > 0 {
        xml.open("p:sldIdLst", &[])?;
        for idx in 0..presentation.slide_count() {
            let id = (FIRST_SLIDE_ID + idx).to_string();
            let rel = slide_rel_id(idx);
            xml.empty("p:sldId", &[("id", &id), ("r:id", &rel)])?;
        }
        xml.close("p:sldIdLst")?;
    }

    let cx = presentation.slide_width().as_emu().to_string();
    let cy = presentation.slide_height().as_emu().to_string();
    xml.empty("p:sldSz", &[("cx", &cx), ("cy", &cy), ("type", "screen4x3")])?;
    xml.empty("p:notesSz", &[("cx", &cy), ("cy", &cx)])?;
    xml.close("p:presentation")?;
    Ok(xml.finish())
}

/// Relationship id of the `idx`th slide (0-based) in the presentation rels.
fn slide_rel_id(idx: usize) -> String {
    format!("rId{}", idx + 2)
}

fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, "rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml")?;
    for idx in 0..slide_count {
        let target = format!("slides/slide{}.xml", idx + 1);
        relationship(&mut xml, &slide_rel_id(idx), REL_SLIDE, &target)?;
    }
    let trailing = [
        (REL_PRES_PROPS, "presProps.xml"),
        (REL_VIEW_PROPS, "viewProps.xml"),
        (REL_THEME, "theme/theme1.xml"),
        (REL_TABLE_STYLES, "tableStyles.xml"),
    ];
    for (offset, (rel_type, target)) in trailing.into_iter().enumerate() {
        relationship(&mut xml, &slide_rel_id(slide_count + offset), rel_type, target)?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn slide_master_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, "rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")?;
    relationship(&mut xml, "rId2", REL_THEME, "../theme/theme1.xml")?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn slide_layout_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, "rId1", REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn slide_rels_xml(media: &[Media]) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    relationship(&mut xml, LAYOUT_REL_ID, REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")?;
    for (n, item) in media.iter().enumerate() {
        let target = item.part.replacen("ppt/", "../", 1);
        relationship(&mut xml, &image_rel_id(n), REL_IMAGE, &target)?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::testing::tiny_png;
    use deck_core::{Picture, Rect, Shape, TextFrame};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample() -> Presentation {
        let mut pres = Presentation::new();
        pres.title = Some("Sample".to_string());
        let mut frame = TextFrame::for_text_box();
        frame.first_paragraph_mut().set_text("hello");
        pres.add_slide()
            .push(Shape::text_box(Rect::inches(1.0, 1.0, 4.0, 1.0), frame));
        let picture = Picture::from_bytes(tiny_png(), "diagram").unwrap();
        pres.add_slide()
            .push(Shape::picture(Rect::inches(1.0, 1.0, 2.0, 1.0), picture));
        pres
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut out = String::new();
        part.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = PptxWriter::new()
            .write(&sample(), Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/media/image1.png",
        ] {
            assert!(names.contains(&required), "missing {}", required);
        }
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let bytes = PptxWriter::new()
            .write(&sample(), Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(pres.contains(r#"<p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/>"#));
        assert!(pres.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId3""#));
        assert!(rels.contains(r#"Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Id="rId7""#));
    }

    #[test]
    fn test_picture_media_is_related_and_typed() {
        let bytes = PptxWriter::new()
            .write(&sample(), Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains(r#"Target="../media/image1.png""#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/ppt/slides/slide2.xml""#));

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Sample</dc:title>"));
    }

    #[test]
    fn test_equal_presentations_produce_equal_bytes() {
        let writer = PptxWriter::default();
        let first = writer.write(&sample(), Cursor::new(Vec::new())).unwrap().into_inner();
        let second = writer.write(&sample(), Cursor::new(Vec::new())).unwrap().into_inner();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_presentation_omits_slide_list() {
        let bytes = PptxWriter::new()
            .write(&Presentation::new(), Cursor::new(Vec::new()))
            .unwrap()
            .into_inner();
        let pres = read_part(&bytes, "ppt/presentation.xml");
        assert!(!pres.contains("sldIdLst"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pptx");
        PptxWriter::new().save(&sample(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
