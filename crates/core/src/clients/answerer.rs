use super::{post_json, EndpointConfig};
use crate::traits::LegalAnswerer;
use crate::CollaboratorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct AnswerRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct AnswerResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Posts the assembled prompt as JSON to a question answering endpoint.
pub struct HttpAnswerer {
    config: Option<EndpointConfig>,
    client: Client,
}

impl HttpAnswerer {
    pub fn new(config: Option<EndpointConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LegalAnswerer for HttpAnswerer {
    async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let cfg = self
            .config
            .as_ref()
            .ok_or(CollaboratorError::NotConfigured("question answering"))?;

        let payload: AnswerResponse =
            post_json(&self.client, cfg, &AnswerRequest { prompt }).await?;
        payload_to_answer(payload, cfg.endpoint.as_str())
    }
}

fn payload_to_answer(payload: AnswerResponse, backend: &str) -> Result<String, CollaboratorError> {
    payload
        .response
        .or(payload.text)
        .filter(|answer| !answer.trim().is_empty())
        .ok_or_else(|| CollaboratorError::BackendResponse {
            backend: backend.to_string(),
            details: "answer was empty".to_string(),
        })
}
