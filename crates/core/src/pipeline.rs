use crate::extractor::{
    ExtractionStrategy, LopdfExtractor, PdfRenderExtractor, PlainTextExtractor, RawBytesExtractor,
};
use crate::models::{DocumentFormat, ExtractionConfig, ExtractionOutcome, ExtractionResult};
use crate::ocr::TesseractOcr;
use crate::word::DocxExtractor;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const PLACEHOLDER_STRATEGY: &str = "placeholder";

type StrategyChain = Vec<Box<dyn ExtractionStrategy>>;

/// Runs the ordered strategy chain for a file's format until one result is
/// accepted. It never fails: a file nothing can read gets the placeholder text.
pub struct ExtractionPipeline {
    chains: HashMap<DocumentFormat, StrategyChain>,
    min_accepted_chars: usize,
}

impl ExtractionPipeline {
    pub fn new(min_accepted_chars: usize) -> Self {
        Self {
            chains: HashMap::new(),
            min_accepted_chars,
        }
    }

    /// The production chains: OCR for images, lopdf then pdf-extract then a raw
    /// decode for PDFs, docx paragraphs for word files, strict UTF-8 otherwise.
    pub fn standard(config: &ExtractionConfig) -> Self {
        Self::new(config.min_accepted_chars)
            .with_chain(
                DocumentFormat::Image,
                vec![Box::new(TesseractOcr::from_config(config))],
            )
            .with_chain(
                DocumentFormat::Pdf,
                vec![
                    Box::new(LopdfExtractor),
                    Box::new(PdfRenderExtractor),
                    Box::new(RawBytesExtractor),
                ],
            )
            .with_chain(DocumentFormat::Word, vec![Box::new(DocxExtractor)])
            .with_chain(DocumentFormat::Text, vec![Box::new(PlainTextExtractor)])
    }

    pub fn with_chain(mut self, format: DocumentFormat, chain: StrategyChain) -> Self {
        self.chains.insert(format, chain);
        self
    }

    pub fn run(&self, filename: &str, bytes: &[u8]) -> ExtractionOutcome {
        let format = DocumentFormat::from_filename(filename);
        let chain = self.chains.get(&format).map(Vec::as_slice).unwrap_or_default();

        let mut diagnostics = Vec::with_capacity(chain.len());
        let mut last_strategy = PLACEHOLDER_STRATEGY;

        for strategy in chain {
            let result = self.attempt(strategy.as_ref(), bytes);
            debug!(
                filename,
                strategy = result.strategy,
                accepted = result.accepted,
                diagnostic = %result.diagnostic,
                "extraction attempt"
            );
            diagnostics.push(result.diagnostic.clone());
            last_strategy = result.strategy;

            if result.accepted {
                info!(
                    filename,
                    strategy = result.strategy,
                    chars = result.text.chars().count(),
                    "text extracted"
                );
                return ExtractionOutcome {
                    format,
                    text: result.text,
                    strategy: result.strategy.to_string(),
                    accepted: true,
                    diagnostics,
                };
            }
        }

        warn!(
            filename,
            last_strategy,
            "text extraction minimal or failed, storing placeholder"
        );
        ExtractionOutcome {
            format,
            text: placeholder_text(filename),
            strategy: PLACEHOLDER_STRATEGY.to_string(),
            accepted: false,
            diagnostics,
        }
    }

    fn attempt(&self, strategy: &dyn ExtractionStrategy, bytes: &[u8]) -> ExtractionResult {
        match strategy.extract(bytes) {
            Ok(text) => ExtractionResult::success(strategy.name(), text, self.min_accepted_chars),
            Err(error) => ExtractionResult::failure(strategy.name(), error.to_string()),
        }
    }
}

pub fn placeholder_text(filename: &str) -> String {
    format!(
        "Document {filename} uploaded but text extraction was minimal or failed. \
         This may be a scanned document or unsupported format."
    )
}
