//! Slides and the presentation that owns them.

use crate::shapes::Shape;
use crate::units::Length;

/// A whole deck: slides in presentation order plus the slide size.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    /// Document title recorded in the package properties.
    pub title: Option<String>,
    slides: Vec<Slide>,
    slide_width: Length,
    slide_height: Length,
}

impl Presentation {
    /// Create an empty presentation sized 10" × 7.5" (4:3).
    pub fn new() -> Self {
        Self {
            title: None,
            slides: Vec::new(),
            slide_width: Length::inches(10.0),
            slide_height: Length::inches(7.5),
        }
    }

    /// Append a blank slide and return it.
    pub fn add_slide(&mut self) -> &mut Slide {
        let idx = self.slides.len();
        self.slides.push(Slide::new(idx + 1));
        &mut self.slides[idx]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_width(&self) -> Length {
        self.slide_width
    }

    pub fn slide_height(&self) -> Length {
        self.slide_height
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

/// A single slide built from the blank layout.
///
/// Shapes draw in insertion order; later shapes sit on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,
    shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape on top of the existing ones.
    pub fn push(&mut self, shape: Shape) -> &mut Shape {
        let idx = self.shapes.len();
        self.shapes.push(shape);
        &mut self.shapes[idx]
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Text of every text-bearing shape, in z-order.
    pub fn texts(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(Shape::text_frame)
            .map(|frame| frame.text())
            .filter(|text| !text.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use crate::text::TextFrame;
    use crate::units::Rect;

    #[test]
    fn test_new_presentation_is_four_by_three() {
        let pres = Presentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width().as_emu(), 9_144_000);
        assert_eq!(pres.slide_height().as_emu(), 6_858_000);
    }

    #[test]
    fn test_slides_are_numbered_in_order() {
        let mut pres = Presentation::new();
        pres.add_slide();
        pres.add_slide();
        let numbers: Vec<usize> = pres.slides().iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_slide_texts_skip_empty_frames() {
        let mut slide = Slide::new(1);
        slide.push(Shape::text_box(Rect::inches(0.0, 0.0, 1.0, 1.0), TextFrame::new()));
        let mut frame = TextFrame::for_text_box();
        frame.first_paragraph_mut().set_text("hello");
        slide.push(Shape::text_box(Rect::inches(0.0, 1.0, 1.0, 1.0), frame));
        assert_eq!(slide.shape_count(), 2);
        assert_eq!(slide.texts(), vec!["hello".to_string()]);
    }
}
