//! Fact-check pass: fake-news classifier label per article.

use newsdesk_core::article::fields;
use newsdesk_core::Article;

use crate::error::EnrichError;
use crate::hub::HubClient;
use crate::pass::{ArticleField, LabelPass, PassSummary};
use crate::translate::Translator;

/// Writes `fact` and `fact_conf` onto articles.
#[derive(Clone)]
pub struct FactChecker {
    pass: LabelPass,
}

impl FactChecker {
    #[must_use]
    pub fn new(hub: HubClient, translator: Translator, model: &str) -> Self {
        Self {
            pass: LabelPass {
                name: "fact_check",
                hub,
                translator,
                model: model.to_string(),
                label_key: fields::FACT,
                conf_key: fields::FACT_CONF,
            },
        }
    }

    /// Labels every article in place from the text in `field`.
    ///
    /// # Errors
    ///
    /// The first translation or inference failure aborts the pass.
    pub async fn annotate(
        &self,
        articles: &mut [Article],
        field: ArticleField,
    ) -> Result<PassSummary, EnrichError> {
        self.pass.annotate(articles, field).await
    }
}
