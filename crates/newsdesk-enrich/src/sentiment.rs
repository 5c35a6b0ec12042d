//! Sentiment pass: financial-news sentiment label per article.

use newsdesk_core::article::fields;
use newsdesk_core::Article;

use crate::error::EnrichError;
use crate::hub::HubClient;
use crate::pass::{ArticleField, LabelPass, PassSummary};
use crate::translate::Translator;

/// Writes `sentiment` and `sentiment_conf` onto articles.
#[derive(Clone)]
pub struct SentimentAnalyser {
    pass: LabelPass,
}

impl SentimentAnalyser {
    #[must_use]
    pub fn new(hub: HubClient, translator: Translator, model: &str) -> Self {
        Self {
            pass: LabelPass {
                name: "sentiment",
                hub,
                translator,
                model: model.to_string(),
                label_key: fields::SENTIMENT,
                conf_key: fields::SENTIMENT_CONF,
            },
        }
    }

    /// Labels every article in place from the text in `field`.
    ///
    /// # Errors
    ///
    /// The first translation or inference failure aborts the pass. Articles
    /// labelled before the failure keep their labels.
    pub async fn annotate(
        &self,
        articles: &mut [Article],
        field: ArticleField,
    ) -> Result<PassSummary, EnrichError> {
        self.pass.annotate(articles, field).await
    }
}
