//! Thin event-writer wrapper used to emit package parts.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::XmlError(e.to_string())
}

/// Builds one XML part in memory.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a standalone UTF-8 document.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::with_capacity(4096));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    /// Write `<name attrs...>`.
    pub(crate) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Start(start))
            .map_err(xml_error)
    }

    /// Write `<name attrs.../>`.
    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Empty(start))
            .map_err(xml_error)
    }

    /// Write `</name>`.
    pub(crate) fn close(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// Write escaped character data.
    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)
    }

    /// Write `<name>text</name>`.
    pub(crate) fn leaf(&mut self, name: &str, text: &str) -> Result<()> {
        self.open(name, &[])?;
        self.text(text)?;
        self.close(name)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_escapes_text_and_attributes() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.open("a:p", &[("descr", "a \"b\" & c")]).unwrap();
        xml.leaf("a:t", "x < y && z").unwrap();
        xml.empty("a:br", &[]).unwrap();
        xml.close("a:p").unwrap();

        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(out.contains(r#"descr="a &quot;b&quot; &amp; c""#));
        assert!(out.contains("<a:t>x &lt; y &amp;&amp; z</a:t>"));
        assert!(out.contains("<a:br/>"));
    }
}
