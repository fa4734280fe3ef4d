//! Shape variants placed on a slide.

use crate::error::{Error, Result};
use crate::text::TextFrame;
use crate::units::{Length, Rect, Rgb};

/// Preset geometry of an autoshape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Rectangle,
    RightArrow,
}

/// Border of an autoshape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    /// Whatever the theme's line style says.
    Theme,
    /// No border at all.
    Hidden,
    Solid { color: Rgb, width: Option<Length> },
}

/// A filled geometric shape that can hold text.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoShape {
    pub geometry: Geometry,
    pub fill: Option<Rgb>,
    pub outline: Outline,
    pub text: TextFrame,
}

impl AutoShape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            fill: None,
            outline: Outline::Theme,
            text: TextFrame::for_auto_shape(),
        }
    }

    pub fn with_fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub fill: Option<Rgb>,
    pub text: TextFrame,
}

/// A fixed row × column grid of cells.
///
/// Rows are never ragged: every row has exactly `column_count` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    column_widths: Vec<Length>,
    row_heights: Vec<Length>,
    /// Style the first row as a header.
    pub first_row: bool,
    /// Alternate row banding.
    pub band_row: bool,
}

impl Table {
    /// Create an empty grid filling `width` × `height`, split evenly.
    pub fn new(rows: usize, columns: usize, width: Length, height: Length) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| (0..columns).map(|_| Cell::default()).collect())
                .collect(),
            column_widths: split_evenly(width, columns),
            row_heights: split_evenly(height, rows),
            first_row: true,
            band_row: true,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_widths(&self) -> &[Length] {
        &self.column_widths
    }

    pub fn row_heights(&self) -> &[Length] {
        &self.row_heights
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }
}

/// Split `total` into `parts` lengths; the last part absorbs the remainder.
fn split_evenly(total: Length, parts: usize) -> Vec<Length> {
    if parts == 0 {
        return Vec::new();
    }
    let each = total.as_emu() / parts as i64;
    let mut lengths = vec![Length::emu(each); parts];
    let remainder = total.as_emu() - each * parts as i64;
    if let Some(last) = lengths.last_mut() {
        *last = Length::emu(each + remainder);
    }
    lengths
}

/// Raster formats a picture can be embedded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// File extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// An embedded raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    data: Vec<u8>,
    format: ImageFormat,
    pixel_width: usize,
    pixel_height: usize,
    /// Alternative text, usually the source file name.
    pub description: String,
}

impl Picture {
    /// Wrap image bytes, detecting their format and pixel size.
    pub fn from_bytes(data: Vec<u8>, description: impl Into<String>) -> Result<Self> {
        let format = match imagesize::image_type(&data) {
            Ok(imagesize::ImageType::Png) => ImageFormat::Png,
            Ok(imagesize::ImageType::Jpeg) => ImageFormat::Jpeg,
            Ok(imagesize::ImageType::Gif) => ImageFormat::Gif,
            Ok(imagesize::ImageType::Bmp) => ImageFormat::Bmp,
            Ok(other) => {
                return Err(Error::UnsupportedImage(format!(
                    "{:?} images cannot be embedded",
                    other
                )))
            }
            Err(e) => return Err(Error::UnsupportedImage(e.to_string())),
        };

        let size = imagesize::blob_size(&data)
            .map_err(|e| Error::UnsupportedImage(format!("Failed to read image size: {}", e)))?;
        if size.width == 0 || size.height == 0 {
            return Err(Error::UnsupportedImage("Image has no pixels".to_string()));
        }

        Ok(Self {
            data,
            format,
            pixel_width: size.width,
            pixel_height: size.height,
            description: description.into(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Pixel size as (width, height).
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.pixel_width, self.pixel_height)
    }

    /// Height that keeps the aspect ratio when drawn `width` wide.
    pub fn height_for_width(&self, width: Length) -> Length {
        let scaled = width.as_emu() as f64 * self.pixel_height as f64 / self.pixel_width as f64;
        Length::emu(scaled as i64)
    }
}

/// What a shape is.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    AutoShape(AutoShape),
    TextBox(TextFrame),
    Table(Table),
    Picture(Picture),
}

/// A positioned visual primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub bounds: Rect,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn auto_shape(bounds: Rect, shape: AutoShape) -> Self {
        Self {
            bounds,
            kind: ShapeKind::AutoShape(shape),
        }
    }

    pub fn text_box(bounds: Rect, frame: TextFrame) -> Self {
        Self {
            bounds,
            kind: ShapeKind::TextBox(frame),
        }
    }

    pub fn table(bounds: Rect, table: Table) -> Self {
        Self {
            bounds,
            kind: ShapeKind::Table(table),
        }
    }

    pub fn picture(bounds: Rect, picture: Picture) -> Self {
        Self {
            bounds,
            kind: ShapeKind::Picture(picture),
        }
    }

    /// The text frame of a text box or autoshape.
    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.kind {
            ShapeKind::AutoShape(shape) => Some(&shape.text),
            ShapeKind::TextBox(frame) => Some(frame),
            ShapeKind::Table(_) | ShapeKind::Picture(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            ShapeKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_text_box(&self) -> bool {
        matches!(self.kind, ShapeKind::TextBox(_))
    }
}
