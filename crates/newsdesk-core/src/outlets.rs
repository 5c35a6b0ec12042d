//! Outlet and category configuration file.
//!
//! The file groups outlet domains by language:
//!
//! ```json
//! { "outlets": { "en": ["x.com", "y.com"], "fr": ["z.fr"] },
//!   "categories": ["finance", "politics"] }
//! ```
//!
//! Loading flattens the grouping into an ordered domain to language mapping.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ConfigError;

/// One news outlet and the language its articles are tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlet {
    pub domain: String,
    pub language: String,
}

/// Flat domain to language mapping, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outlets {
    entries: Vec<Outlet>,
}

impl Outlets {
    /// Build a mapping from `(domain, language)` pairs.
    ///
    /// Domains are trimmed and lowercased, so `X.com` and `x.com` are the
    /// same outlet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a domain is empty or appears
    /// more than once.
    pub fn from_pairs<I, D, L>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (D, L)>,
        D: Into<String>,
        L: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (domain, language) in pairs {
            let domain = domain.into().trim().to_lowercase();
            let language = language.into();
            if domain.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "empty outlet domain under language '{language}'"
                )));
            }
            if !seen.insert(domain.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate outlet domain: '{domain}'"
                )));
            }
            entries.push(Outlet { domain, language });
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outlet> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed outlet/category file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsConfig {
    pub outlets: Outlets,
    /// Search keywords, also used as the `category` tag on matching articles.
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NewsConfigFile {
    outlets: Map<String, Value>,
    #[serde(default)]
    categories: Vec<String>,
}

/// Load and validate the outlet/category file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::ConfigFileIo`] if the file cannot be read,
/// [`ConfigError::ConfigFileParse`] if it is not valid JSON of the expected
/// shape, or [`ConfigError::Validation`] if it fails validation.
pub fn load_config(path: &Path) -> Result<NewsConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_config(&content)
}

/// Parse and validate outlet/category JSON already in memory.
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(content: &str) -> Result<NewsConfig, ConfigError> {
    let file: NewsConfigFile = serde_json::from_str(content)?;

    let mut pairs = Vec::new();
    for (language, domains) in file.outlets {
        let domains: Vec<String> = serde_json::from_value(domains)?;
        pairs.extend(domains.into_iter().map(|d| (d, language.clone())));
    }
    let outlets = Outlets::from_pairs(pairs)?;

    let categories: Vec<String> = file
        .categories
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();
    if categories.iter().any(String::is_empty) {
        return Err(ConfigError::Validation(
            "category keywords must be non-empty".to_string(),
        ));
    }

    Ok(NewsConfig {
        outlets,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_outlets_in_file_order() {
        let cfg = parse_config(
            r#"{
                "outlets": { "en": ["x.com", "y.com"], "fr": ["z.fr"] },
                "categories": ["finance", "politics"]
            }"#,
        )
        .unwrap();

        let pairs: Vec<(&str, &str)> = cfg
            .outlets
            .iter()
            .map(|o| (o.domain.as_str(), o.language.as_str()))
            .collect();
        assert_eq!(pairs, vec![("x.com", "en"), ("y.com", "en"), ("z.fr", "fr")]);
        assert_eq!(cfg.categories, vec!["finance", "politics"]);
    }

    #[test]
    fn every_domain_appears_exactly_once() {
        let cfg = parse_config(
            r#"{ "outlets": { "de": ["a.de", "b.de"], "es": ["c.es"], "en": ["d.com"] } }"#,
        )
        .unwrap();

        assert_eq!(cfg.outlets.len(), 4);
        for domain in ["a.de", "b.de", "c.es", "d.com"] {
            assert_eq!(cfg.outlets.iter().filter(|o| o.domain == domain).count(), 1);
        }
        let c_es = cfg.outlets.iter().find(|o| o.domain == "c.es").unwrap();
        assert_eq!(c_es.language, "es");
        assert!(cfg.categories.is_empty());
    }

    #[test]
    fn duplicate_domain_across_languages_is_rejected() {
        let err = parse_config(r#"{ "outlets": { "en": ["x.com"], "fr": ["X.com"] } }"#)
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")),
            "expected duplicate validation error, got: {err:?}"
        );
    }

    #[test]
    fn domains_are_stored_lowercase() {
        let cfg = parse_config(r#"{ "outlets": { "en": [" Reuters.COM "], "fr": ["LeMonde.fr"] } }"#)
            .unwrap();

        let domains: Vec<&str> = cfg.outlets.iter().map(|o| o.domain.as_str()).collect();
        assert_eq!(domains, vec!["reuters.com", "lemonde.fr"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_config(r#"{ "outlets": { "en": ["x.com" "#).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileParse(_)));
    }

    #[test]
    fn outlets_must_be_lists_of_strings() {
        let err = parse_config(r#"{ "outlets": { "en": "x.com" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileParse(_)));
    }

    #[test]
    fn blank_category_is_rejected() {
        let err = parse_config(r#"{ "outlets": { "en": ["x.com"] }, "categories": [" "] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/definitely/not/here/config.json")).unwrap_err();
        assert!(
            matches!(err, ConfigError::ConfigFileIo { ref path, .. } if path.ends_with("config.json")),
            "expected ConfigFileIo, got: {err:?}"
        );
    }
}
