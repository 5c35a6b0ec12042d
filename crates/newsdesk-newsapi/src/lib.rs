//! Client for the news search API.
//!
//! [`NewsListener`] walks the configured outlet/keyword matrix, one request
//! per outlet for headlines and one per (outlet, keyword) pair for
//! categorised articles, tagging each article with its outlet's language.

pub mod client;
pub mod error;
pub mod report;

pub use client::NewsListener;
pub use error::NewsApiError;
pub use report::{CategorisedFetch, FetchReport, PairOutcome};
