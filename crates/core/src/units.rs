//! Lengths, colors and rectangles in the slide coordinate space.
//!
//! All geometry is kept in EMU (English Metric Units), the native unit of
//! DrawingML. Conversions from inches and points truncate toward zero.

use std::fmt;
use std::ops::{Add, Sub};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// A length in EMU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(i64);

impl Length {
    /// Zero length.
    pub const ZERO: Length = Length(0);

    /// Create a length from a raw EMU count.
    pub const fn emu(value: i64) -> Self {
        Self(value)
    }

    /// Create a length from inches.
    pub fn inches(value: f64) -> Self {
        Self((value * EMU_PER_INCH as f64) as i64)
    }

    /// Create a length from points.
    pub fn points(value: f64) -> Self {
        Self((value * EMU_PER_POINT as f64) as i64)
    }

    /// The raw EMU count.
    pub const fn as_emu(self) -> i64 {
        self.0
    }

    /// The length in inches.
    pub fn as_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }

    /// The length in hundredths of a point, as used by `spcPts`.
    pub fn as_centipoints(self) -> i64 {
        self.0 * 100 / EMU_PER_POINT
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex form without a leading `#`, e.g. `003366`.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl Rect {
    /// Create a rectangle from EMU lengths.
    pub fn new(x: Length, y: Length, width: Length, height: Length) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from inch values.
    pub fn inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Length::inches(x),
            Length::inches(y),
            Length::inches(width),
            Length::inches(height),
        )
    }

    /// Bottom edge.
    pub fn bottom(&self) -> Length {
        self.y + self.height
    }

    /// Whether the vertical extents of the two rectangles intersect.
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }
}
