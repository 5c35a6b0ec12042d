//! Article enrichment passes for newsdesk.
//!
//! Each pass reads one text field per article, translates it to the target
//! language when the article is tagged with another one, and sends it to a
//! hosted model on the inference hub:
//!
//! - [`SentimentAnalyser`] writes `sentiment` / `sentiment_conf`.
//! - [`FactChecker`] writes `fact` / `fact_conf`.
//! - [`KeywordExtractor`] accumulates a [`KeywordTally`] across articles.
//!
//! Any hub or translation failure aborts the pass.

pub mod error;
pub mod fact_check;
pub mod hub;
pub mod keywords;
pub mod pass;
pub mod sentiment;
pub mod translate;

pub use error::EnrichError;
pub use fact_check::FactChecker;
pub use hub::{Classification, HubClient};
pub use keywords::{parse_keywords, KeywordExtractor, KeywordTally};
pub use pass::{ArticleField, PassSummary};
pub use sentiment::SentimentAnalyser;
pub use translate::Translator;
