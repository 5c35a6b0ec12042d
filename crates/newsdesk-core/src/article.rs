//! The article record shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys newsdesk reads or writes. Any other key is carried through verbatim
/// from the news API.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const LANGUAGE: &str = "language";
    pub const CATEGORY: &str = "category";
    pub const SENTIMENT: &str = "sentiment";
    pub const SENTIMENT_CONF: &str = "sentiment_conf";
    pub const FACT: &str = "fact";
    pub const FACT_CONF: &str = "fact_conf";
}

/// A news article as returned by the search API, plus derived fields.
///
/// Kept as an open JSON object so unknown upstream keys survive to storage
/// untouched. Key order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(Map<String, Value>);

impl Article {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the string at `key`, or `None` when it is absent, null, not a
    /// string, or blank.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.text(fields::TITLE)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.text(fields::DESCRIPTION)
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.text(fields::LANGUAGE)
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.text(fields::CATEGORY)
    }

    pub fn set_language(&mut self, language: &str) {
        self.insert(fields::LANGUAGE, Value::from(language));
    }

    pub fn set_category(&mut self, category: &str) {
        self.insert(fields::CATEGORY, Value::from(category));
    }

    /// Write a classification result as a `label_key`/`conf_key` pair.
    pub fn set_label(&mut self, label_key: &str, conf_key: &str, label: &str, confidence: f64) {
        self.insert(label_key, Value::from(label));
        self.insert(conf_key, Value::from(confidence));
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(value: Value) -> Article {
        serde_json::from_value(value).expect("article fixture should deserialize")
    }

    #[test]
    fn text_ignores_null_and_blank_values() {
        let a = article(serde_json::json!({
            "title": "Stocks rise",
            "description": null,
            "content": "   "
        }));
        assert_eq!(a.title(), Some("Stocks rise"));
        assert_eq!(a.description(), None);
        assert_eq!(a.text("content"), None);
        assert_eq!(a.text("missing"), None);
    }

    #[test]
    fn set_label_writes_label_and_confidence() {
        let mut a = Article::default();
        a.set_label(fields::SENTIMENT, fields::SENTIMENT_CONF, "positive", 0.91);
        assert_eq!(a.get("sentiment"), Some(&Value::from("positive")));
        assert_eq!(a.get("sentiment_conf"), Some(&Value::from(0.91)));
    }

    #[test]
    fn upstream_keys_survive_serialization() {
        let a = article(serde_json::json!({
            "source": { "id": null, "name": "X" },
            "title": "Stocks rise",
            "url": "https://x.com/a"
        }));
        let mut tagged = a.clone();
        tagged.set_language("en");
        let value = tagged.into_value();
        assert_eq!(value["source"]["name"], "X");
        assert_eq!(value["url"], "https://x.com/a");
        assert_eq!(value["language"], "en");
    }
}
