pub mod analysis;
pub mod answerer;
pub mod drafting;
pub mod speech;

pub use analysis::HttpDocumentAnalyzer;
pub use answerer::HttpAnswerer;
pub use drafting::HttpDocumentDrafter;
pub use speech::HttpSpeechRecognizer;

use crate::CollaboratorError;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// Location and credentials of an HTTP collaborator.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
}

impl EndpointConfig {
    /// Blank values count as unset, so an empty endpoint yields `Ok(None)`.
    pub fn parse(
        endpoint: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<Option<Self>, CollaboratorError> {
        let endpoint = match endpoint.map(str::trim).filter(|value| !value.is_empty()) {
            Some(endpoint) => Url::parse(endpoint)?,
            None => return Ok(None),
        };

        let api_key = api_key
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Some(Self { endpoint, api_key }))
    }
}

/// Posts `body` as JSON, with bearer auth when a key is set, and decodes the
/// JSON reply. Non-2xx statuses become [`CollaboratorError::BackendResponse`].
pub(crate) async fn post_json<B, R>(
    client: &Client,
    cfg: &EndpointConfig,
    body: &B,
) -> Result<R, CollaboratorError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(cfg.endpoint.clone()).json(body);
    if let Some(api_key) = &cfg.api_key {
        request = request.bearer_auth(api_key);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(CollaboratorError::BackendResponse {
            backend: cfg.endpoint.to_string(),
            details: format!("status {}", response.status()),
        });
    }

    Ok(response.json().await?)
}
