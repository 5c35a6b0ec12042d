//! Keyword extraction and frequency tally.

use std::collections::HashMap;

use newsdesk_core::Article;
use serde_json::{Map, Value};

use crate::error::EnrichError;
use crate::hub::HubClient;
use crate::pass::{ArticleField, PassSummary};
use crate::translate::Translator;

/// Split generated keyword text on commas and trim each piece.
///
/// Empty pieces are kept; [`KeywordTally::top_k`] drops them.
#[must_use]
pub fn parse_keywords(generated: &str) -> Vec<String> {
    generated
        .split(',')
        .map(|k| k.trim().to_string())
        .collect()
}

/// Keyword occurrence counts, remembering first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl KeywordTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, keyword: &str) {
        if let Some(&slot) = self.index.get(keyword) {
            self.counts[slot].1 += 1;
        } else {
            self.index.insert(keyword.to_string(), self.counts.len());
            self.counts.push((keyword.to_string(), 1));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `k` most frequent non-empty keywords, highest count first.
    ///
    /// Ties keep first-seen order (the sort is stable).
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .iter()
            .filter(|(keyword, _)| !keyword.is_empty())
            .cloned()
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }

    /// [`Self::top_k`] as a `{keyword: count}` JSON object, in rank order.
    #[must_use]
    pub fn top_k_document(&self, k: usize) -> Value {
        let map: Map<String, Value> = self
            .top_k(k)
            .into_iter()
            .map(|(keyword, count)| (keyword, Value::from(count)))
            .collect();
        Value::Object(map)
    }
}

impl<S: AsRef<str>> Extend<S> for KeywordTally {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for keyword in iter {
            self.add(keyword.as_ref());
        }
    }
}

/// Runs a keyword-generation model over article text.
#[derive(Clone)]
pub struct KeywordExtractor {
    hub: HubClient,
    translator: Translator,
    model: String,
}

impl KeywordExtractor {
    #[must_use]
    pub fn new(hub: HubClient, translator: Translator, model: &str) -> Self {
        Self {
            hub,
            translator,
            model: model.to_string(),
        }
    }

    /// Keywords for a single text tagged with `language`.
    async fn extract(
        &self,
        text: &str,
        language: Option<&str>,
    ) -> Result<Vec<String>, EnrichError> {
        let text = self.translator.translate(text, language).await?;
        let generated = self.hub.generate(&self.model, &text).await?;
        Ok(parse_keywords(&generated))
    }

    /// Tallies keywords across all articles, in article order.
    ///
    /// # Errors
    ///
    /// The first translation or generation failure aborts the pass.
    pub async fn tally(
        &self,
        articles: &[Article],
        field: ArticleField,
    ) -> Result<(KeywordTally, PassSummary), EnrichError> {
        tracing::info!(
            pass = "keywords",
            field = %field,
            articles = articles.len(),
            "starting enrichment pass"
        );
        let mut tally = KeywordTally::new();
        let mut summary = PassSummary::default();

        for (index, article) in articles.iter().enumerate() {
            let Some(text) = article.text(field.key()) else {
                tracing::debug!(pass = "keywords", index, field = %field, "no text; skipping article");
                summary.skipped += 1;
                continue;
            };
            let keywords = self.extract(text, article.language()).await?;
            tally.extend(keywords);
            summary.processed += 1;
        }

        tracing::info!(
            pass = "keywords",
            processed = summary.processed,
            skipped = summary.skipped,
            distinct = tally.len(),
            "enrichment pass complete"
        );
        Ok((tally, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(keywords: &[&str]) -> KeywordTally {
        let mut tally = KeywordTally::new();
        tally.extend(keywords.iter().copied());
        tally
    }

    #[test]
    fn parse_keywords_splits_and_trims() {
        assert_eq!(
            parse_keywords("stocks,  markets ,rally"),
            vec!["stocks", "markets", "rally"]
        );
    }

    #[test]
    fn parse_keywords_keeps_empty_pieces() {
        assert_eq!(parse_keywords("stocks,,"), vec!["stocks", "", ""]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let tally = tally_of(&["a", "b", "a", "c", "b", "a", "b", "a", "b", "a", "b"]);
        assert_eq!(
            tally.top_k(3),
            vec![
                ("a".to_string(), 5),
                ("b".to_string(), 5),
                ("c".to_string(), 1)
            ]
        );

        let top = tally.top_k(2);
        assert_eq!(top, vec![("a".to_string(), 5), ("b".to_string(), 5)]);
    }

    #[test]
    fn tie_break_follows_first_seen_not_alphabetical() {
        let tally = tally_of(&["zeta", "alpha", "alpha", "zeta"]);
        let top = tally.top_k(1);
        assert_eq!(top, vec![("zeta".to_string(), 2)]);
    }

    #[test]
    fn empty_keyword_never_ranked() {
        let tally = tally_of(&["", "", "", "stocks"]);
        assert_eq!(tally.len(), 2, "the empty key is counted but not ranked");
        let top = tally.top_k(10);
        assert_eq!(top, vec![("stocks".to_string(), 1)]);
    }

    #[test]
    fn top_k_without_empty_key_is_fine() {
        let tally = tally_of(&["stocks"]);
        assert_eq!(tally.top_k(5).len(), 1);
    }

    #[test]
    fn top_k_truncates() {
        let tally = tally_of(&["a", "b", "c", "d"]);
        assert_eq!(tally.top_k(3).len(), 3);
        assert!(tally.top_k(0).is_empty());
    }

    #[test]
    fn top_k_document_is_ranked_object() {
        let tally = tally_of(&["oil", "gas", "gas", ""]);
        let doc = tally.top_k_document(10);
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["gas", "oil"]);
        assert_eq!(doc["gas"], 2);
        assert_eq!(doc["oil"], 1);
    }
}
