//! Inference hub client for hosted classification and generation models.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::EnrichError;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// One label with its confidence, as returned by a text-classification model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Classification models answer either with a flat list of labels or with
/// one list per input.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<Classification>>),
    Flat(Vec<Classification>),
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

/// HTTP client for the inference hub.
#[derive(Clone)]
pub struct HubClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl HubClient {
    /// Creates a client for the hub at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the client cannot be built, or
    /// [`EnrichError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdesk/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| EnrichError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Classifies `text` with `model` and returns the highest-scoring label.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Inference`] on a non-2xx response, an
    /// unexpected body, or an empty label list.
    pub async fn classify(&self, model: &str, text: &str) -> Result<Classification, EnrichError> {
        let body = self.infer(model, text).await?;
        let parsed: ClassifyResponse = serde_json::from_str(&body).map_err(|e| {
            EnrichError::Inference(format!("{model}: unexpected classification body: {e}"))
        })?;

        let labels = match parsed {
            ClassifyResponse::Nested(mut outer) if !outer.is_empty() => outer.swap_remove(0),
            ClassifyResponse::Nested(_) => Vec::new(),
            ClassifyResponse::Flat(labels) => labels,
        };

        best_label(labels)
            .ok_or_else(|| EnrichError::Inference(format!("{model}: no labels returned")))
    }

    /// Runs a text-to-text model and returns its generated text.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Inference`] on a non-2xx response or an
    /// unexpected body.
    pub async fn generate(&self, model: &str, text: &str) -> Result<String, EnrichError> {
        let body = self.infer(model, text).await?;
        let generated: Vec<Generated> = serde_json::from_str(&body).map_err(|e| {
            EnrichError::Inference(format!("{model}: unexpected generation body: {e}"))
        })?;

        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| EnrichError::Inference(format!("{model}: no generation returned")))
    }

    async fn infer(&self, model: &str, text: &str) -> Result<String, EnrichError> {
        let url = self
            .base_url
            .join(&format!("models/{model}"))
            .map_err(|e| EnrichError::InvalidUrl {
                url: model.to_string(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EnrichError::Inference(format!(
                "{model} returned status {status}: {}",
                body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>()
            )));
        }

        Ok(body)
    }
}

fn best_label(labels: Vec<Classification>) -> Option<Classification> {
    labels
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
}
