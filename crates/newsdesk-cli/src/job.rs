//! The pipeline run: fetch, enrich, aggregate, persist.
//!
//! Every step runs sequentially. A headline fetch, enrichment or persistence
//! failure aborts the run before anything is written; categorised fetch
//! failures are recorded per (domain, keyword) pair and the run continues.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use newsdesk_core::{AppConfig, Article, NewsConfig};
use newsdesk_db::{collections, DocumentStore, RunSnapshot};
use newsdesk_enrich::{
    ArticleField, FactChecker, HubClient, KeywordExtractor, SentimentAnalyser, Translator,
};
use newsdesk_newsapi::{CategorisedFetch, NewsListener, PairOutcome};
use serde_json::{json, Value};

/// Counts and aggregates from one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) headlines: usize,
    pub(crate) categorised: usize,
    pub(crate) failed_pairs: Vec<PairOutcome>,
    pub(crate) top_keywords: Vec<(String, usize)>,
}

pub(crate) struct CronJob {
    news_api_key: String,
    newsapi_base_url: String,
    request_timeout_secs: u64,
    news: NewsConfig,
    top_k: usize,
    sentiment: SentimentAnalyser,
    fact_checker: FactChecker,
    keywords: KeywordExtractor,
    store: Arc<dyn DocumentStore>,
}

impl CronJob {
    /// Builds the hub and translation clients shared by the enrichment passes.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or a configured
    /// base URL does not parse.
    pub(crate) fn new(
        config: &AppConfig,
        news: NewsConfig,
        store: Arc<dyn DocumentStore>,
    ) -> anyhow::Result<Self> {
        let hub = HubClient::with_base_url(
            &config.hub_token,
            config.request_timeout_secs,
            &config.hub_base_url,
        )
        .context("failed to build inference hub client")?;
        let translator = Translator::new(
            &config.translate_url,
            &config.target_language,
            config.translate_api_key.as_deref(),
            config.translate_timeout_secs,
        )
        .context("failed to build translation client")?;

        Ok(Self {
            news_api_key: config.news_api_key.clone(),
            newsapi_base_url: config.newsapi_base_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            news,
            top_k: config.top_k,
            sentiment: SentimentAnalyser::new(
                hub.clone(),
                translator.clone(),
                &config.sentiment_model,
            ),
            fact_checker: FactChecker::new(hub.clone(), translator.clone(), &config.fact_model),
            keywords: KeywordExtractor::new(hub, translator, &config.keyword_model),
            store,
        })
    }

    // Built per run so the `from` date is the day the run starts.
    fn listener(&self) -> anyhow::Result<NewsListener> {
        NewsListener::with_base_url(
            &self.news_api_key,
            self.news.outlets.clone(),
            self.news.categories.clone(),
            self.request_timeout_secs,
            &self.newsapi_base_url,
        )
        .context("failed to build news API client")
    }

    /// Executes one full run and commits every collection together.
    ///
    /// # Errors
    ///
    /// Returns the first fetch, enrichment or persistence failure. Nothing is
    /// written to the store when a run fails.
    pub(crate) async fn run(&self) -> anyhow::Result<RunReport> {
        let listener = self.listener()?;
        tracing::info!(
            from = %listener.from_date(),
            outlets = self.news.outlets.len(),
            categories = self.news.categories.len(),
            "run started"
        );

        let mut headlines = listener
            .get_headlines()
            .await
            .context("headline fetch failed")?;
        let CategorisedFetch {
            articles: mut categorised,
            report,
        } = listener.get_categorised().await;

        self.sentiment
            .annotate(&mut headlines, ArticleField::Description)
            .await
            .context("sentiment pass over headlines failed")?;
        self.sentiment
            .annotate(&mut categorised, ArticleField::Description)
            .await
            .context("sentiment pass over categorised articles failed")?;
        let (tally, _) = self
            .keywords
            .tally(&headlines, ArticleField::Title)
            .await
            .context("keyword pass over headlines failed")?;
        if tally.is_empty() {
            tracing::warn!("keyword pass produced no keywords");
        }
        self.fact_checker
            .annotate(&mut categorised, ArticleField::Title)
            .await
            .context("fact-check pass over categorised articles failed")?;

        let run_report = RunReport {
            headlines: headlines.len(),
            categorised: categorised.len(),
            failed_pairs: report.failed().cloned().collect(),
            top_keywords: tally.top_k(self.top_k),
        };

        let snapshot = RunSnapshot::new()
            .one(collections::TOP_KEYWORDS, tally.top_k_document(self.top_k))
            .many(collections::HEADLINES, into_documents(headlines))
            .many(collections::CATEGORISED, into_documents(categorised))
            .one(collections::STATUS, status_document(Utc::now()));
        self.store
            .commit(snapshot)
            .await
            .context("failed to persist run results")?;

        tracing::info!(
            headlines = run_report.headlines,
            categorised = run_report.categorised,
            pairs_ok = report.succeeded_count(),
            failed_pairs = run_report.failed_pairs.len(),
            keywords = run_report.top_keywords.len(),
            "run complete"
        );
        Ok(run_report)
    }
}

fn into_documents(articles: Vec<Article>) -> Vec<Value> {
    articles.into_iter().map(Article::into_value).collect()
}

pub(crate) fn status_document(last_run: DateTime<Utc>) -> Value {
    json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "last_run": last_run.to_rfc3339(),
    })
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
