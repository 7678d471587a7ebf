use clap::Parser;
use lexdoc_core::ExtractionConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "lexdoc-server", version, about = "Legal document assistant API")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listening port
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Extra allowed CORS origin; "*" allows any origin.
    #[arg(long, env = "FRONTEND_URL", default_value = "*")]
    pub frontend_url: String,

    /// Directory that keeps the raw uploaded files.
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted request body, in megabytes.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 50)]
    pub max_upload_mb: usize,

    /// Question answering model endpoint.
    #[arg(long, env = "QA_ENDPOINT")]
    pub qa_endpoint: Option<String>,

    #[arg(long, env = "QA_API_KEY", hide_env_values = true)]
    pub qa_api_key: Option<String>,

    /// Speech-to-text endpoint.
    #[arg(long, env = "SPEECH_ENDPOINT")]
    pub speech_endpoint: Option<String>,

    #[arg(long, env = "SPEECH_API_KEY", hide_env_values = true)]
    pub speech_api_key: Option<String>,

    /// Legal document drafting endpoint.
    #[arg(long, env = "DRAFTING_ENDPOINT")]
    pub drafting_endpoint: Option<String>,

    #[arg(long, env = "DRAFTING_API_KEY", hide_env_values = true)]
    pub drafting_api_key: Option<String>,

    /// Legal document analysis endpoint.
    #[arg(long, env = "ANALYSIS_ENDPOINT")]
    pub analysis_endpoint: Option<String>,

    #[arg(long, env = "ANALYSIS_API_KEY", hide_env_values = true)]
    pub analysis_api_key: Option<String>,

    /// Language used for live recordings.
    #[arg(long, env = "SPEECH_LANGUAGE", default_value = "en-IN")]
    pub speech_language: String,

    /// Tesseract executable used for image OCR.
    #[arg(long, env = "TESSERACT_BIN", default_value = "tesseract")]
    pub tesseract_bin: String,

    /// OCR time budget per image, in seconds.
    #[arg(long, env = "OCR_TIMEOUT_SECS", default_value_t = 10)]
    pub ocr_timeout_secs: u64,

    /// Tesseract language pack, e.g. "eng+hin".
    #[arg(long, env = "OCR_LANGUAGE")]
    pub ocr_language: Option<String>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            ocr_binary: self.tesseract_bin.clone(),
            ocr_timeout: Duration::from_secs(self.ocr_timeout_secs),
            ocr_language: self.ocr_language.clone(),
            ..ExtractionConfig::default()
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
