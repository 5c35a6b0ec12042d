//! Per-request outcomes for the categorised fetch.
//!
//! A failed (domain, keyword) request does not abort the categorised fetch;
//! it is recorded here so the caller can see exactly which pairs were
//! dropped.

use newsdesk_core::Article;

/// Outcome of one (domain, keyword) search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub domain: String,
    pub keyword: String,
    /// Number of articles returned, or the error message.
    pub result: Result<usize, String>,
}

/// All pair outcomes of one categorised fetch, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl FetchReport {
    pub fn failed(&self) -> impl Iterator<Item = &PairOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }
}

/// Result of [`crate::NewsListener::get_categorised`].
#[derive(Debug, Clone, Default)]
pub struct CategorisedFetch {
    pub articles: Vec<Article>,
    pub report: FetchReport,
}
