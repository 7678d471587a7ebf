use super::{post_json, EndpointConfig};
use crate::classifier::classify;
use crate::models::DocumentAnalysis;
use crate::traits::DocumentAnalyzer;
use crate::CollaboratorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct AnalysisRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalysisResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    document_type: Option<String>,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    risk_level: Option<String>,
}

/// Sends a legal text to an analysis endpoint. The legal domain is tagged
/// locally with the keyword classifier.
pub struct HttpDocumentAnalyzer {
    config: Option<EndpointConfig>,
    client: Client,
}

impl HttpDocumentAnalyzer {
    pub fn new(config: Option<EndpointConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DocumentAnalyzer for HttpDocumentAnalyzer {
    async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, CollaboratorError> {
        let cfg = self
            .config
            .as_ref()
            .ok_or(CollaboratorError::NotConfigured("document analysis"))?;

        let payload: AnalysisResponse =
            post_json(&self.client, cfg, &AnalysisRequest { text }).await?;
        payload_to_analysis(payload, text, cfg.endpoint.as_str())
    }
}

fn payload_to_analysis(
    payload: AnalysisResponse,
    text: &str,
    backend: &str,
) -> Result<DocumentAnalysis, CollaboratorError> {
    let summary = payload
        .summary
        .or(payload.analysis)
        .filter(|summary| !summary.trim().is_empty())
        .ok_or_else(|| CollaboratorError::BackendResponse {
            backend: backend.to_string(),
            details: "analysis had no summary".to_string(),
        })?;

    Ok(DocumentAnalysis {
        summary,
        document_type: payload.document_type,
        key_points: payload.key_points,
        risk_level: payload.risk_level,
        legal_domain: classify(text),
    })
}
