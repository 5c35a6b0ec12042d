//! Translation client (LibreTranslate-compatible `POST /translate`).

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::EnrichError;

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translates article text into a single target language.
///
/// Unlike the other outbound calls, translation carries its own (usually
/// shorter) timeout.
#[derive(Clone)]
pub struct Translator {
    client: Client,
    url: Url,
    target: String,
    api_key: Option<String>,
}

impl Translator {
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the client cannot be built, or
    /// [`EnrichError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        target: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdesk/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let url = Url::parse(&normalised)
            .and_then(|u| u.join("translate"))
            .map_err(|e| EnrichError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            url,
            target: target.to_owned(),
            api_key: api_key.map(ToOwned::to_owned),
        })
    }

    /// Whether text tagged with `language` needs no translation.
    #[must_use]
    pub fn is_target(&self, language: Option<&str>) -> bool {
        language.is_some_and(|l| l.eq_ignore_ascii_case(&self.target))
    }

    /// Translates `text` into the target language.
    ///
    /// Text already tagged with the target language is returned unchanged
    /// without a request. Untagged text is sent with `source: "auto"`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Translate`] on a non-2xx response or an
    /// unexpected body, and [`EnrichError::Http`] on network failure or
    /// timeout.
    pub async fn translate(&self, text: &str, language: Option<&str>) -> Result<String, EnrichError> {
        if self.is_target(language) {
            return Ok(text.to_string());
        }

        let request = TranslateRequest {
            q: text,
            source: language.unwrap_or("auto"),
            target: &self.target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichError::Translate(format!(
                "translate returned status {}",
                response.status()
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::Translate(format!("translate response parse error: {e}")))?;

        Ok(parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_language_match_ignores_case() {
        let t = Translator::new("https://libretranslate.com", "en", None, 25).unwrap();
        assert!(t.is_target(Some("en")));
        assert!(t.is_target(Some("EN")));
        assert!(!t.is_target(Some("fr")));
        assert!(!t.is_target(None));
    }

    #[test]
    fn request_omits_missing_api_key() {
        let request = TranslateRequest {
            q: "bonjour",
            source: "fr",
            target: "en",
            format: "text",
            api_key: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "q": "bonjour", "source": "fr", "target": "en", "format": "text" })
        );
    }
}
