//! HTTP client for the news search API.
//!
//! Wraps `reqwest` with API key management, percent-encoded query building,
//! and outlet language tagging. Error envelopes (`"status": "error"`) and
//! non-2xx responses surface as [`NewsApiError::Api`].

use std::time::Duration;

use chrono::{Local, NaiveDate};
use newsdesk_core::{Article, Outlets};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::NewsApiError;
use crate::report::{CategorisedFetch, PairOutcome};

const SEARCH_ENDPOINT: &str = "everything";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

/// Fetches today's articles for every configured outlet.
///
/// The `from` date is fixed when the listener is built, so a run that spans
/// midnight still queries a single day.
pub struct NewsListener {
    client: Client,
    api_key: String,
    outlets: Outlets,
    keywords: Vec<String>,
    from_date: NaiveDate,
    endpoint: Url,
}

impl NewsListener {
    /// Creates a listener for the news API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`NewsApiError::Http`] if the client cannot be constructed, or
    /// [`NewsApiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        outlets: Outlets,
        keywords: Vec<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NewsApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdesk/0.1")
            .build()?;

        // Exactly one trailing slash, so `join` appends the endpoint instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|u| u.join(SEARCH_ENDPOINT))
            .map_err(|e| NewsApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            outlets,
            keywords,
            from_date: Local::now().date_naive(),
            endpoint,
        })
    }

    /// Overrides the `from` date computed at construction.
    #[must_use]
    pub fn with_from_date(mut self, from_date: NaiveDate) -> Self {
        self.from_date = from_date;
        self
    }

    #[must_use]
    pub fn from_date(&self) -> NaiveDate {
        self.from_date
    }

    /// Fetches unfiltered articles, one request per outlet.
    ///
    /// Every article is tagged with its outlet's `language`. Results keep the
    /// outlet order of the config and the API's order within each outlet.
    ///
    /// # Errors
    ///
    /// Any failed request aborts the whole fetch and is returned as a
    /// [`NewsApiError`].
    pub async fn get_headlines(&self) -> Result<Vec<Article>, NewsApiError> {
        tracing::info!(outlets = self.outlets.len(), "fetching headlines");
        let mut articles = Vec::new();

        for outlet in self.outlets.iter() {
            let mut batch = self.search(&outlet.domain, None).await?;
            for article in &mut batch {
                article.set_language(&outlet.language);
            }
            tracing::debug!(
                domain = %outlet.domain,
                count = batch.len(),
                "fetched headlines"
            );
            articles.extend(batch);
        }

        Ok(articles)
    }

    /// Fetches keyword-filtered articles for every (outlet, keyword) pair,
    /// outlet outer, keyword inner.
    ///
    /// Articles are tagged with `category` (the keyword) and `language`.
    /// A failed pair contributes nothing and is recorded in the returned
    /// [`crate::FetchReport`]; the remaining pairs are still fetched. No retries.
    pub async fn get_categorised(&self) -> CategorisedFetch {
        tracing::info!(
            outlets = self.outlets.len(),
            keywords = self.keywords.len(),
            "fetching categorised articles"
        );
        let mut fetch = CategorisedFetch::default();

        for outlet in self.outlets.iter() {
            for keyword in &self.keywords {
                let result = match self.search(&outlet.domain, Some(keyword)).await {
                    Ok(mut batch) => {
                        for article in &mut batch {
                            article.set_category(keyword);
                            article.set_language(&outlet.language);
                        }
                        let count = batch.len();
                        fetch.articles.extend(batch);
                        Ok(count)
                    }
                    Err(e) => {
                        tracing::warn!(
                            domain = %outlet.domain,
                            keyword = %keyword,
                            error = %e,
                            "categorised fetch failed; skipping pair"
                        );
                        Err(e.to_string())
                    }
                };
                fetch.report.outcomes.push(PairOutcome {
                    domain: outlet.domain.clone(),
                    keyword: keyword.clone(),
                    result,
                });
            }
        }

        if fetch.report.failed_count() > 0 {
            tracing::warn!(
                failed = fetch.report.failed_count(),
                total = fetch.report.outcomes.len(),
                "some categorised requests failed"
            );
        }

        fetch
    }

    async fn search(
        &self,
        domain: &str,
        keyword: Option<&str>,
    ) -> Result<Vec<Article>, NewsApiError> {
        let url = self.build_url(domain, keyword);
        let context = match keyword {
            Some(q) => format!("{SEARCH_ENDPOINT}(domains={domain}, q={q})"),
            None => format!("{SEARCH_ENDPOINT}(domains={domain})"),
        };
        self.request_articles(&url, &context).await
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn build_url(&self, domain: &str, keyword: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("from", &self.from_date.format("%Y-%m-%d").to_string());
            pairs.append_pair("apiKey", &self.api_key);
            pairs.append_pair("domains", domain);
            if let Some(q) = keyword {
                pairs.append_pair("q", q);
            }
        }
        url
    }

    /// Sends a GET request and unwraps the `articles` array.
    ///
    /// `context` names the request in errors; it never contains the API key.
    async fn request_articles(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Vec<Article>, NewsApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: SearchEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(source) if status.is_success() => {
                return Err(NewsApiError::Deserialize {
                    context: context.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(NewsApiError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                });
            }
        };

        if !status.is_success() || envelope.status.as_deref() == Some("error") {
            return Err(NewsApiError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(envelope.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_listener(base_url: &str) -> NewsListener {
        let outlets = Outlets::from_pairs([("x.com", "en")]).unwrap();
        NewsListener::with_base_url("test-key", outlets, vec![], 30, base_url)
            .expect("listener construction should not fail")
            .with_from_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    #[test]
    fn build_url_constructs_headline_query() {
        let listener = test_listener("https://newsapi.org/v2");
        let url = listener.build_url("x.com", None);
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?from=2024-03-09&apiKey=test-key&domains=x.com"
        );
    }

    #[test]
    fn build_url_adds_keyword_and_handles_trailing_slash() {
        let listener = test_listener("https://newsapi.org/v2/");
        let url = listener.build_url("x.com", Some("finance"));
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?from=2024-03-09&apiKey=test-key&domains=x.com&q=finance"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let listener = test_listener("https://newsapi.org/v2");
        let url = listener.build_url("x.com", Some("oil & gas"));
        assert!(
            url.as_str().contains("q=oil+%26+gas") || url.as_str().contains("q=oil%20%26%20gas"),
            "keyword should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = NewsListener::with_base_url("k", Outlets::default(), vec![], 30, "not a url");
        assert!(matches!(
            result,
            Err(NewsApiError::InvalidBaseUrl { .. })
        ));
    }
}
