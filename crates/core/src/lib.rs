pub mod classifier;
pub mod clients;
pub mod context;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod ocr;
pub mod orchestrator;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod word;

pub use classifier::classify;
pub use clients::{
    EndpointConfig, HttpAnswerer, HttpDocumentAnalyzer, HttpDocumentDrafter, HttpSpeechRecognizer,
};
pub use context::{AssembledContext, ContextAssembler, ContextConfig, ContextMode};
pub use error::{CollaboratorError, ExtractionError};
pub use extractor::{
    ExtractionStrategy, LopdfExtractor, PageText, PdfRenderExtractor, PlainTextExtractor,
    RawBytesExtractor,
};
pub use ingest::{digest_bytes, ingest_upload, persist_upload, upload_basename, IngestedUpload};
pub use models::{
    builtin_speech_languages, truncate_with_ellipsis, Document, DocumentAnalysis, DocumentFormat,
    DocumentSummary, ExtractionConfig, ExtractionOutcome, ExtractionResult, LegalDomain,
    SpeechLanguage, Transcription,
};
pub use ocr::TesseractOcr;
pub use orchestrator::{QueryAnalysis, QueryAnswer, QueryCoordinator};
pub use pipeline::{placeholder_text, ExtractionPipeline, PLACEHOLDER_STRATEGY};
pub use store::DocumentStore;
pub use traits::{DocumentAnalyzer, DocumentDrafter, LegalAnswerer, SpeechRecognizer};
pub use word::DocxExtractor;
