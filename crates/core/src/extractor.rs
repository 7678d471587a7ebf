use crate::error::ExtractionError;
use lopdf::Document;
use std::panic;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// One way of recovering text from a file's bytes.
///
/// Strategies report failure through the returned error. The pipeline turns it
/// into a non-accepted result and moves on to the next strategy in the chain.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Structured text extraction through lopdf's content stream decoding.
#[derive(Debug, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError> {
        let document = Document::load_mem(bytes)
            .map_err(|error| ExtractionError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            match document.extract_text(&[page_no]) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(page = page_no, chars = text.chars().count(), "lopdf page text");
                    pages.push(PageText {
                        number: page_no,
                        text,
                    });
                }
                Ok(_) => debug!(page = page_no, "lopdf page has no text"),
                Err(error) => debug!(page = page_no, %error, "lopdf page text failed"),
            }
        }

        Ok(pages)
    }
}

impl ExtractionStrategy for LopdfExtractor {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(join_pages(&self.extract_pages(bytes)?))
    }
}

/// Rendering based extraction through pdf-extract's text output device.
#[derive(Debug, Default)]
pub struct PdfRenderExtractor;

impl ExtractionStrategy for PdfRenderExtractor {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs.
        let rendered = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractionError::PdfParse("pdf-extract panicked".to_string()))?
            .map_err(|error| ExtractionError::PdfParse(error.to_string()))?;

        Ok(join_pages(&split_form_feed_pages(&rendered)))
    }
}

/// Last resort for PDFs that are really text files: lossy UTF-8 decode.
#[derive(Debug, Default)]
pub struct RawBytesExtractor;

impl ExtractionStrategy for RawBytesExtractor {
    fn name(&self) -> &'static str {
        "raw-utf8"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Strict UTF-8 decode for plain text and unrecognised formats.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

impl ExtractionStrategy for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "utf8"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

pub fn join_pages(pages: &[PageText]) -> String {
    let mut joined = String::new();
    for page in pages {
        joined.push_str(&page.text);
        joined.push('\n');
    }
    joined
}

/// Splits rendered text into pages on form feed, dropping blank pages.
pub fn split_form_feed_pages(raw_text: &str) -> Vec<PageText> {
    raw_text
        .split('\u{000c}')
        .enumerate()
        .filter_map(|(index, chunk)| {
            let normalized = chunk.trim();
            if normalized.is_empty() {
                None
            } else {
                Some(PageText {
                    number: (index + 1) as u32,
                    text: normalized.to_string(),
                })
            }
        })
        .collect()
}
