use crate::error::ExtractionError;
use crate::extractor::ExtractionStrategy;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph text from an Office Open XML word-processing package.
///
/// Legacy binary `.doc` files are not zip packages and fail here.
#[derive(Debug, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    fn document_xml(bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|error| ExtractionError::WordParse(error.to_string()))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|error| ExtractionError::WordParse(format!("{DOCUMENT_PART}: {error}")))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        Ok(xml)
    }
}

impl ExtractionStrategy for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let xml = Self::document_xml(bytes)?;
        let mut text = String::new();
        for paragraph in paragraphs_from_document_xml(&xml)? {
            text.push_str(&paragraph);
            text.push('\n');
        }
        Ok(text)
    }
}

/// Collects the `w:t` runs of every `w:p` element, one string per paragraph.
pub fn paragraphs_from_document_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|error| ExtractionError::WordParse(error.to_string()))?;
        match event {
            Event::Start(element) => match element.local_name().as_ref() {
                b"t" => in_text = true,
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(text) if in_text => {
                let unescaped = text
                    .unescape()
                    .map_err(|error| ExtractionError::WordParse(error.to_string()))?;
                current.push_str(&unescaped);
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
