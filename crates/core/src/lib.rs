//! Core document model, theme, style engine and layout primitives for
//! building slide decks.

pub mod error;
pub mod layout;
pub mod shapes;
pub mod style;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod text;
pub mod theme;
pub mod types;
pub mod units;

pub use error::{Error, Result};
pub use layout::{Card, Cursor};
pub use shapes::{AutoShape, Cell, Geometry, ImageFormat, Outline, Picture, Shape, ShapeKind, Table};
pub use style::{apply_paragraph_style, apply_run_style, apply_style, Style, StyleOutcome, StyleTarget};
pub use text::{Alignment, Anchor, Inline, Paragraph, Run, TextFrame, TextProperties};
pub use types::{Presentation, Slide};
pub use units::{Length, Rect, Rgb};
