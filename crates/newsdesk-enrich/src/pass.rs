//! Shared plumbing for the per-article classification passes.

use newsdesk_core::article::fields;
use newsdesk_core::Article;

use crate::error::EnrichError;
use crate::hub::{Classification, HubClient};
use crate::translate::Translator;

/// Which article text a pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleField {
    Title,
    Description,
}

impl ArticleField {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ArticleField::Title => fields::TITLE,
            ArticleField::Description => fields::DESCRIPTION,
        }
    }
}

impl std::fmt::Display for ArticleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Counts from one pass over an article list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Articles sent to the model.
    pub processed: usize,
    /// Articles whose field was absent, null or blank.
    pub skipped: usize,
}

/// A classification model whose top label is written back onto articles.
#[derive(Clone)]
pub(crate) struct LabelPass {
    pub(crate) name: &'static str,
    pub(crate) hub: HubClient,
    pub(crate) translator: Translator,
    pub(crate) model: String,
    pub(crate) label_key: &'static str,
    pub(crate) conf_key: &'static str,
}

impl LabelPass {
    pub(crate) async fn classify(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<Classification, EnrichError> {
        let text = self.translator.translate(text, language).await?;
        self.hub.classify(&self.model, &text).await
    }

    pub(crate) async fn annotate(
        &self,
        articles: &mut [Article],
        field: ArticleField,
    ) -> Result<PassSummary, EnrichError> {
        tracing::info!(
            pass = self.name,
            field = %field,
            articles = articles.len(),
            "starting enrichment pass"
        );
        let mut summary = PassSummary::default();

        for (index, article) in articles.iter_mut().enumerate() {
            let Some(text) = article.text(field.key()).map(ToOwned::to_owned) else {
                tracing::debug!(pass = self.name, index, field = %field, "no text; skipping article");
                summary.skipped += 1;
                continue;
            };

            let result = self.classify(&text, article.language()).await?;
            article.set_label(self.label_key, self.conf_key, &result.label, result.score);
            summary.processed += 1;
        }

        tracing::info!(
            pass = self.name,
            processed = summary.processed,
            skipped = summary.skipped,
            "enrichment pass complete"
        );
        Ok(summary)
    }
}
