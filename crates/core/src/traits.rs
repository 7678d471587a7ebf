use crate::models::{builtin_speech_languages, DocumentAnalysis, SpeechLanguage};
use crate::{CollaboratorError, Transcription};
use async_trait::async_trait;

/// The downstream legal question answering model.
#[async_trait]
pub trait LegalAnswerer: Send + Sync {
    async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

/// Speech-to-text engine for recorded or uploaded audio.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        language: &str,
    ) -> Result<Transcription, CollaboratorError>;

    async fn supported_languages(&self) -> Result<Vec<SpeechLanguage>, CollaboratorError> {
        Ok(builtin_speech_languages())
    }
}

/// Drafts a formal legal document from a case description.
#[async_trait]
pub trait DocumentDrafter: Send + Sync {
    async fn draft(
        &self,
        description: &str,
        preferred_type: Option<&str>,
    ) -> Result<String, CollaboratorError>;
}

/// Summarises a legal text and flags its risks.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, CollaboratorError>;
}
