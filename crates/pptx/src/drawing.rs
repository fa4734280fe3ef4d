//! Slide XML: shapes, text bodies and character properties.

use deck_core::{
    Alignment, Anchor, AutoShape, Geometry, Inline, Outline, Paragraph, Picture, Rect, Result, Rgb,
    Shape, ShapeKind, Slide, Table, TextFrame, TextProperties,
};

use crate::parts::{NS_DRAWING, NS_MAIN, NS_RELS, NS_TABLE, TABLE_STYLE_ID};
use crate::xml::XmlBuilder;

/// Relationship id of the slide layout in every slide's rels part.
pub(crate) const LAYOUT_REL_ID: &str = "rId1";

/// Relationship id of the `n`th picture (0-based) on a slide.
pub(crate) fn image_rel_id(n: usize) -> String {
    format!("rId{}", n + 2)
}

/// Serialize a slide. Pictures reference their media through
/// [`image_rel_id`] in the order they appear on the slide.
pub(crate) fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.open(
        "p:sld",
        &[("xmlns:a", NS_DRAWING), ("xmlns:r", NS_RELS), ("xmlns:p", NS_MAIN)],
    )?;
    xml.open("p:cSld", &[])?;
    xml.open("p:spTree", &[])?;

    xml.open("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvGrpSpPr")?;
    xml.open("p:grpSpPr", &[])?;
    xml.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    xml.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    xml.close("a:xfrm")?;
    xml.close("p:grpSpPr")?;

    let mut pictures = 0;
    for (idx, shape) in slide.shapes().iter().enumerate() {
        // id 1 is the group root
        let id = idx as u32 + 2;
        write_shape(&mut xml, shape, id, &mut pictures)?;
    }

    xml.close("p:spTree")?;
    xml.close("p:cSld")?;
    xml.open("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.close("p:clrMapOvr")?;
    xml.close("p:sld")?;
    Ok(xml.finish())
}

fn write_shape(xml: &mut XmlBuilder, shape: &Shape, id: u32, pictures: &mut usize) -> Result<()> {
    match &shape.kind {
        ShapeKind::AutoShape(auto) => write_auto_shape(xml, &shape.bounds, auto, id),
        ShapeKind::TextBox(frame) => write_text_box(xml, &shape.bounds, frame, id),
        ShapeKind::Table(table) => write_table(xml, &shape.bounds, table, id),
        ShapeKind::Picture(picture) => {
            let rel_id = image_rel_id(*pictures);
            *pictures += 1;
            write_picture(xml, &shape.bounds, picture, id, &rel_id)
        }
    }
}

fn write_non_visual(xml: &mut XmlBuilder, id: u32, name: &str, text_box: bool) -> Result<()> {
    xml.open("p:nvSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", &id.to_string()), ("name", name)])?;
    if text_box {
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        xml.empty("p:cNvSpPr", &[])?;
    }
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvSpPr")
}

fn write_xfrm(xml: &mut XmlBuilder, tag: &str, bounds: &Rect) -> Result<()> {
    xml.open(tag, &[])?;
    xml.empty(
        "a:off",
        &[
            ("x", &bounds.x.as_emu().to_string()),
            ("y", &bounds.y.as_emu().to_string()),
        ],
    )?;
    xml.empty(
        "a:ext",
        &[
            ("cx", &bounds.width.as_emu().to_string()),
            ("cy", &bounds.height.as_emu().to_string()),
        ],
    )?;
    xml.close(tag)
}

fn write_preset_geometry(xml: &mut XmlBuilder, preset: &str) -> Result<()> {
    xml.open("a:prstGeom", &[("prst", preset)])?;
    xml.empty("a:avLst", &[])?;
    xml.close("a:prstGeom")
}

fn write_solid_fill(xml: &mut XmlBuilder, color: Rgb) -> Result<()> {
    xml.open("a:solidFill", &[])?;
    xml.empty("a:srgbClr", &[("val", &color.to_hex())])?;
    xml.close("a:solidFill")
}

fn write_auto_shape(
    xml: &mut XmlBuilder,
    bounds: &Rect,
    shape: &AutoShape,
    id: u32,
) -> Result<()> {
    let (preset, label) = match shape.geometry {
        Geometry::Rectangle => ("rect", "Rectangle"),
        Geometry::RightArrow => ("rightArrow", "Right Arrow"),
    };

    xml.open("p:sp", &[])?;
    write_non_visual(xml, id, &format!("{} {}", label, id - 1), false)?;

    xml.open("p:spPr", &[])?;
    write_xfrm(xml, "a:xfrm", bounds)?;
    write_preset_geometry(xml, preset)?;
    if let Some(fill) = shape.fill {
        write_solid_fill(xml, fill)?;
    }
    match shape.outline {
        Outline::Theme => {}
        Outline::Hidden => {
            xml.open("a:ln", &[])?;
            xml.empty("a:noFill", &[])?;
            xml.close("a:ln")?;
        }
        Outline::Solid { color, width } => {
            match width {
                Some(width) => xml.open("a:ln", &[("w", &width.as_emu().to_string())])?,
                None => xml.open("a:ln", &[])?,
            }
            write_solid_fill(xml, color)?;
            xml.close("a:ln")?;
        }
    }
    xml.close("p:spPr")?;

    write_shape_style(xml)?;
    write_text_body(xml, "p:txBody", &shape.text)?;
    xml.close("p:sp")
}

/// Theme references every inserted autoshape carries.
fn write_shape_style(xml: &mut XmlBuilder) -> Result<()> {
    xml.open("p:style", &[])?;
    for (tag, idx, color) in [
        ("a:lnRef", "1", "accent1"),
        ("a:fillRef", "3", "accent1"),
        ("a:effectRef", "2", "accent1"),
        ("a:fontRef", "minor", "lt1"),
    ] {
        xml.open(tag, &[("idx", idx)])?;
        xml.empty("a:schemeClr", &[("val", color)])?;
        xml.close(tag)?;
    }
    xml.close("p:style")
}

fn write_text_box(xml: &mut XmlBuilder, bounds: &Rect, frame: &TextFrame, id: u32) -> Result<()> {
    xml.open("p:sp", &[])?;
    write_non_visual(xml, id, &format!("TextBox {}", id - 1), true)?;
    xml.open("p:spPr", &[])?;
    write_xfrm(xml, "a:xfrm", bounds)?;
    write_preset_geometry(xml, "rect")?;
    xml.empty("a:noFill", &[])?;
    xml.close("p:spPr")?;
    write_text_body(xml, "p:txBody", frame)?;
    xml.close("p:sp")
}

fn write_text_body(xml: &mut XmlBuilder, tag: &str, frame: &TextFrame) -> Result<()> {
    xml.open(tag, &[])?;

    let wrap = frame.word_wrap.map(|w| if w { "square" } else { "none" });
    let left = frame.inset_left.map(|l| l.as_emu().to_string());
    let top = frame.inset_top.map(|t| t.as_emu().to_string());
    let anchor = frame.anchor.map(|a| match a {
        Anchor::Top => "t",
        Anchor::Middle => "ctr",
        Anchor::Bottom => "b",
    });
    let attrs: Vec<(&str, &str)> = [
        ("wrap", wrap),
        ("lIns", left.as_deref()),
        ("tIns", top.as_deref()),
        ("rtlCol", Some("0")),
        ("anchor", anchor),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key, v)))
    .collect();

    if frame.auto_fit {
        xml.open("a:bodyPr", &attrs)?;
        xml.empty("a:spAutoFit", &[])?;
        xml.close("a:bodyPr")?;
    } else {
        xml.empty("a:bodyPr", &attrs)?;
    }
    xml.empty("a:lstStyle", &[])?;

    for paragraph in frame.paragraphs() {
        write_paragraph(xml, paragraph)?;
    }
    xml.close(tag)
}

fn write_paragraph(xml: &mut XmlBuilder, paragraph: &Paragraph) -> Result<()> {
    xml.open("a:p", &[])?;

    let algn = paragraph.alignment.map(|a| match a {
        Alignment::Left => "l",
        Alignment::Center => "ctr",
        Alignment::Right => "r",
    });
    let has_defaults = paragraph.defaults != TextProperties::default();
    let has_properties = algn.is_some()
        || paragraph.line_spacing.is_some()
        || paragraph.space_before.is_some()
        || has_defaults;
    if has_properties {
        match algn {
            Some(algn) => xml.open("a:pPr", &[("algn", algn)])?,
            None => xml.open("a:pPr", &[])?,
        }
        if let Some(spacing) = paragraph.line_spacing {
            let pct = ((spacing * 100_000.0).round() as i64).to_string();
            xml.open("a:lnSpc", &[])?;
            xml.empty("a:spcPct", &[("val", &pct)])?;
            xml.close("a:lnSpc")?;
        }
        if let Some(space) = paragraph.space_before {
            xml.open("a:spcBef", &[])?;
            xml.empty("a:spcPts", &[("val", &space.as_centipoints().to_string())])?;
            xml.close("a:spcBef")?;
        }
        if has_defaults {
            write_text_properties(xml, "a:defRPr", &paragraph.defaults, false)?;
        }
        xml.close("a:pPr")?;
    }

    for inline in paragraph.content() {
        match inline {
            Inline::Run(run) => {
                xml.open("a:r", &[])?;
                write_text_properties(xml, "a:rPr", &run.properties, true)?;
                xml.leaf("a:t", run.text())?;
                xml.close("a:r")?;
            }
            Inline::Break => xml.empty("a:br", &[])?,
        }
    }

    xml.close("a:p")
}

/// Write an `a:rPr` or `a:defRPr` container. Children follow schema order:
/// fill, then Latin, then East-Asian typeface.
fn write_text_properties(
    xml: &mut XmlBuilder,
    tag: &str,
    props: &TextProperties,
    is_run: bool,
) -> Result<()> {
    let size = props.size.map(|s| s.to_string());
    let bold = props.bold.map(|b| if b { "1" } else { "0" });
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if is_run {
        attrs.push(("lang", "zh-CN"));
        attrs.push(("altLang", "en-US"));
    }
    if let Some(size) = size.as_deref() {
        attrs.push(("sz", size));
    }
    if let Some(bold) = bold {
        attrs.push(("b", bold));
    }
    if is_run {
        attrs.push(("dirty", "0"));
    }

    if props.color.is_none() && props.latin.is_none() && props.east_asian.is_none() {
        return xml.empty(tag, &attrs);
    }

    xml.open(tag, &attrs)?;
    if let Some(color) = props.color {
        write_solid_fill(xml, color)?;
    }
    if let Some(latin) = &props.latin {
        xml.empty("a:latin", &[("typeface", latin)])?;
    }
    if let Some(east_asian) = &props.east_asian {
        xml.empty("a:ea", &[("typeface", east_asian)])?;
    }
    xml.close(tag)
}

fn write_table(xml: &mut XmlBuilder, bounds: &Rect, table: &Table, id: u32) -> Result<()> {
    xml.open("p:graphicFrame", &[])?;
    xml.open("p:nvGraphicFramePr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", &id.to_string()), ("name", &format!("Table {}", id - 1))],
    )?;
    xml.open("p:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noGrp", "1")])?;
    xml.close("p:cNvGraphicFramePr")?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvGraphicFramePr")?;
    write_xfrm(xml, "p:xfrm", bounds)?;

    xml.open("a:graphic", &[])?;
    xml.open("a:graphicData", &[("uri", NS_TABLE)])?;
    xml.open("a:tbl", &[])?;

    let flag = |on: bool| if on { "1" } else { "0" };
    xml.open(
        "a:tblPr",
        &[("firstRow", flag(table.first_row)), ("bandRow", flag(table.band_row))],
    )?;
    xml.leaf("a:tableStyleId", TABLE_STYLE_ID)?;
    xml.close("a:tblPr")?;

    xml.open("a:tblGrid", &[])?;
    for width in table.column_widths() {
        xml.empty("a:gridCol", &[("w", &width.as_emu().to_string())])?;
    }
    xml.close("a:tblGrid")?;

    for (row, height) in table.rows().iter().zip(table.row_heights()) {
        xml.open("a:tr", &[("h", &height.as_emu().to_string())])?;
        for cell in row {
            xml.open("a:tc", &[])?;
            write_text_body(xml, "a:txBody", &cell.text)?;
            match cell.fill {
                Some(fill) => {
                    xml.open("a:tcPr", &[])?;
                    write_solid_fill(xml, fill)?;
                    xml.close("a:tcPr")?;
                }
                None => xml.empty("a:tcPr", &[])?,
            }
            xml.close("a:tc")?;
        }
        xml.close("a:tr")?;
    }

    xml.close("a:tbl")?;
    xml.close("a:graphicData")?;
    xml.close("a:graphic")?;
    xml.close("p:graphicFrame")
}

fn write_picture(
    xml: &mut XmlBuilder,
    bounds: &Rect,
    picture: &Picture,
    id: u32,
    rel_id: &str,
) -> Result<()> {
    xml.open("p:pic", &[])?;
    xml.open("p:nvPicPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[
            ("id", &id.to_string()),
            ("name", &format!("Picture {}", id - 1)),
            ("descr", &picture.description),
        ],
    )?;
    xml.open("p:cNvPicPr", &[])?;
    xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    xml.close("p:cNvPicPr")?;
    xml.empty("p:nvPr", &[])?;
    xml.close("p:nvPicPr")?;

    xml.open("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rel_id)])?;
    xml.open("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.close("a:stretch")?;
    xml.close("p:blipFill")?;

    xml.open("p:spPr", &[])?;
    write_xfrm(xml, "a:xfrm", bounds)?;
    write_preset_geometry(xml, "rect")?;
    xml.close("p:spPr")?;
    xml.close("p:pic")
}
