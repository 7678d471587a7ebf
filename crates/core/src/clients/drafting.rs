use super::{post_json, EndpointConfig};
use crate::traits::DocumentDrafter;
use crate::CollaboratorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
struct DraftRequest<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preferred_type: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct DraftResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Asks a drafting endpoint for a formal document such as a legal notice or
/// an affidavit.
pub struct HttpDocumentDrafter {
    config: Option<EndpointConfig>,
    client: Client,
}

impl HttpDocumentDrafter {
    pub fn new(config: Option<EndpointConfig>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl DocumentDrafter for HttpDocumentDrafter {
    async fn draft(
        &self,
        description: &str,
        preferred_type: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        let cfg = self
            .config
            .as_ref()
            .ok_or(CollaboratorError::NotConfigured("document drafting"))?;

        let request = DraftRequest {
            description,
            preferred_type: preferred_type.map(str::trim).filter(|kind| !kind.is_empty()),
        };
        let payload: DraftResponse = post_json(&self.client, cfg, &request).await?;
        payload_to_draft(payload, cfg.endpoint.as_str())
    }
}

fn payload_to_draft(payload: DraftResponse, backend: &str) -> Result<String, CollaboratorError> {
    payload
        .content
        .or(payload.text)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| CollaboratorError::BackendResponse {
            backend: backend.to_string(),
            details: "drafted document was empty".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_field_takes_precedence_over_text() {
        let payload: DraftResponse =
            serde_json::from_str(r#"{"content": "LEGAL NOTICE\n...", "text": "ignored"}"#)
                .expect("valid json");

        assert_eq!(
            payload_to_draft(payload, "drafts").expect("draft"),
            "LEGAL NOTICE\n..."
        );
    }

    #[test]
    fn missing_content_is_a_backend_error() {
        let payload: DraftResponse = serde_json::from_str("{}").expect("valid json");

        assert!(matches!(
            payload_to_draft(payload, "drafts"),
            Err(CollaboratorError::BackendResponse { .. })
        ));
    }

    #[test]
    fn blank_preferred_type_is_omitted_from_the_request() {
        let request = DraftRequest {
            description: "tenant withholding rent",
            preferred_type: None,
        };

        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json, serde_json::json!({ "description": "tenant withholding rent" }));
    }

    #[tokio::test]
    async fn unconfigured_drafter_fails_without_network() {
        let drafter = HttpDocumentDrafter::new(None);
        let error = drafter
            .draft("cheque bounced", Some("legal notice"))
            .await
            .expect_err("no endpoint");
        assert_eq!(error.to_string(), "document drafting endpoint is not configured");
    }
}
