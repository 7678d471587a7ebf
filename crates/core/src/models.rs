use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A document held by the [`crate::DocumentStore`], keyed by `filename`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub filename: String,
    pub content: String,
    pub source_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub checksum: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    #[serde(rename = "upload_time")]
    pub uploaded_at: DateTime<Utc>,
    pub content_length: usize,
    pub preview: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Image,
    Pdf,
    Word,
    Text,
}

impl DocumentFormat {
    /// Detects the format from the filename suffix, ignoring case.
    /// Anything unrecognised is treated as text.
    pub fn from_filename(filename: &str) -> Self {
        let lowered = filename.to_lowercase();
        let has_suffix = |suffixes: &[&str]| suffixes.iter().any(|ext| lowered.ends_with(ext));

        if has_suffix(&[".png", ".jpg", ".jpeg"]) {
            Self::Image
        } else if has_suffix(&[".pdf"]) {
            Self::Pdf
        } else if has_suffix(&[".docx", ".doc"]) {
            Self::Word
        } else {
            Self::Text
        }
    }
}

/// Output of a single strategy attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub text: String,
    pub strategy: &'static str,
    pub accepted: bool,
    pub diagnostic: String,
}

impl ExtractionResult {
    pub fn success(strategy: &'static str, text: String, min_chars: usize) -> Self {
        let chars = stripped_len(&text);
        let accepted = chars >= min_chars;
        let diagnostic = if accepted {
            format!("{strategy} extracted {chars} characters")
        } else {
            format!("{strategy} extracted only {chars} characters")
        };

        Self {
            text,
            strategy,
            accepted,
            diagnostic,
        }
    }

    pub fn failure(strategy: &'static str, diagnostic: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            strategy,
            accepted: false,
            diagnostic: diagnostic.into(),
        }
    }
}

/// Final result of one pipeline run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtractionOutcome {
    pub format: DocumentFormat,
    pub text: String,
    pub strategy: String,
    pub accepted: bool,
    pub diagnostics: Vec<String>,
}

pub fn stripped_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Returns the first `max_chars` characters, with `...` appended when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub min_accepted_chars: usize,
    pub ocr_binary: String,
    pub ocr_timeout: Duration,
    pub ocr_language: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_accepted_chars: 10,
            ocr_binary: "tesseract".to_string(),
            ocr_timeout: Duration::from_secs(10),
            ocr_language: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalDomain {
    #[serde(rename = "Constitutional Law")]
    Constitutional,
    #[serde(rename = "Criminal Law")]
    Criminal,
    #[serde(rename = "Consumer Law")]
    Consumer,
    #[serde(rename = "Family Law")]
    Family,
    #[serde(rename = "Property Law")]
    Property,
    #[serde(rename = "General Legal")]
    General,
}

impl LegalDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constitutional => "Constitutional Law",
            Self::Criminal => "Criminal Law",
            Self::Consumer => "Consumer Law",
            Self::Family => "Family Law",
            Self::Property => "Property Law",
            Self::General => "General Legal",
        }
    }
}

impl fmt::Display for LegalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcription {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Transcription {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transcription: None,
            confidence: None,
            error: Some(error.into()),
            features: Vec::new(),
        }
    }
}

/// Structured review of a legal text by the analysis collaborator.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentAnalysis {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    pub key_points: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    pub legal_domain: LegalDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechLanguage {
    pub code: String,
    pub name: String,
}

const SPEECH_LANGUAGES: [(&str, &str); 10] = [
    ("en-IN", "English (India)"),
    ("hi-IN", "Hindi"),
    ("bn-IN", "Bengali"),
    ("ta-IN", "Tamil"),
    ("te-IN", "Telugu"),
    ("mr-IN", "Marathi"),
    ("gu-IN", "Gujarati"),
    ("kn-IN", "Kannada"),
    ("ml-IN", "Malayalam"),
    ("pa-IN", "Punjabi"),
];

/// Languages offered when the speech engine does not publish its own list.
pub fn builtin_speech_languages() -> Vec<SpeechLanguage> {
    SPEECH_LANGUAGES
        .iter()
        .map(|(code, name)| SpeechLanguage {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_filename("scan.JPG"), DocumentFormat::Image);
        assert_eq!(DocumentFormat::from_filename("deed.Pdf"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("notice.DOC"), DocumentFormat::Word);
        assert_eq!(DocumentFormat::from_filename("notes.txt"), DocumentFormat::Text);
        assert_eq!(DocumentFormat::from_filename("README"), DocumentFormat::Text);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        assert_eq!(truncate_with_ellipsis(&text, 3), "ééé...");
        assert_eq!(truncate_with_ellipsis(&text, 5), text);
    }

    #[test]
    fn acceptance_ignores_surrounding_whitespace() {
        let short = ExtractionResult::success("raw", "   abc   \n\n\n\n".to_string(), 10);
        assert!(!short.accepted);

        let long = ExtractionResult::success("raw", "  0123456789  ".to_string(), 10);
        assert!(long.accepted);
    }

    #[test]
    fn legal_domain_serializes_as_label() {
        let json = serde_json::to_string(&LegalDomain::Family).expect("serialize");
        assert_eq!(json, "\"Family Law\"");
    }

    #[test]
    fn builtin_languages_lead_with_indian_english() {
        let languages = builtin_speech_languages();
        assert_eq!(languages.len(), 10);
        assert_eq!(languages[0].code, "en-IN");
        assert!(languages.iter().any(|language| language.name == "Hindi"));
    }
}
