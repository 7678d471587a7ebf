use super::{post_json, EndpointConfig};
use crate::traits::SpeechRecognizer;
use crate::{CollaboratorError, Transcription};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct SpeechRequest<'a> {
    audio_base64: String,
    filename: &'a str,
    language: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct SpeechResponse {
    #[serde(default)]
    transcription: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    error: Option<String>,
}

/// Sends base64 encoded audio to a speech-to-text endpoint.
pub struct HttpSpeechRecognizer {
    config: Option<EndpointConfig>,
    client: Client,
}

impl HttpSpeechRecognizer {
    pub fn new(config: Option<EndpointConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechRecognizer {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
        language: &str,
    ) -> Result<Transcription, CollaboratorError> {
        let cfg = self
            .config
            .as_ref()
            .ok_or(CollaboratorError::NotConfigured("speech recognition"))?;

        let request = SpeechRequest {
            audio_base64: STANDARD.encode(audio),
            filename,
            language,
        };

        let payload: SpeechResponse = post_json(&self.client, cfg, &request).await?;
        Ok(payload_to_transcription(payload, language))
    }
}

fn payload_to_transcription(payload: SpeechResponse, language: &str) -> Transcription {
    let text = payload
        .transcription
        .or(payload.text)
        .filter(|text| !text.trim().is_empty());

    match text {
        Some(text) => Transcription {
            success: true,
            transcription: Some(text.trim().to_string()),
            confidence: payload.confidence,
            error: None,
            features: vec![format!("Speech recognition ({language})")],
        },
        None => Transcription::failed(
            payload
                .error
                .unwrap_or_else(|| "Could not understand audio".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcription_field_takes_precedence_over_text() {
        let payload: SpeechResponse = serde_json::from_str(
            r#"{"transcription": "bail application", "text": "ignored", "confidence": 0.7}"#,
        )
        .expect("both fields parse");

        let transcription = payload_to_transcription(payload, "en-IN");

        assert_eq!(transcription.transcription.as_deref(), Some("bail application"));
    }

    #[test]
    fn text_field_is_accepted() {
        let payload: SpeechResponse =
            serde_json::from_str(r#"{"text": " file an FIR ", "confidence": 0.8}"#).expect("json");

        let transcription = payload_to_transcription(payload, "en-IN");

        assert!(transcription.success);
        assert_eq!(transcription.transcription.as_deref(), Some("file an FIR"));
        assert_eq!(transcription.confidence, Some(0.8));
    }

    #[test]
    fn empty_transcription_carries_backend_error() {
        let payload: SpeechResponse =
            serde_json::from_str(r#"{"error": "audio too short"}"#).expect("json");

        let transcription = payload_to_transcription(payload, "hi-IN");

        assert!(!transcription.success);
        assert_eq!(transcription.error.as_deref(), Some("audio too short"));
    }

    #[tokio::test]
    async fn unconfigured_recognizer_fails_without_network() {
        let recognizer = HttpSpeechRecognizer::new(None);
        assert!(matches!(
            recognizer.transcribe(b"RIFF", "a.wav", "en-IN").await,
            Err(CollaboratorError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn languages_fall_back_to_the_builtin_table() {
        let recognizer = HttpSpeechRecognizer::new(None);
        let languages = recognizer.supported_languages().await.expect("languages");
        assert_eq!(languages, crate::builtin_speech_languages());
    }
}
