//! External detector interfaces.
//!
//! A detector takes one sentence and returns at most one match descriptor.
//! `Ok(None)` means the provider was reached and reported nothing;
//! `Err(DetectorError)` means the lookup itself failed. The aggregator
//! collapses errors to "no match" at its boundary, keeping the distinction
//! available here for tracing and tests. No detector retries: a failed or
//! empty lookup is final for that sentence in that run.

pub mod academic;
pub mod web;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::types::PaperMatch;

pub use academic::SemanticScholar;
pub use web::{HtmlWebSearch, WebSearchDisabled};

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

pub type DetectorFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<Option<T>, DetectorError>> + Send + 'a>>;

/// Looks a sentence up in an academic-metadata corpus.
pub trait AcademicDetector: Send + Sync {
    fn name(&self) -> &str;

    /// Exact-phrase lookup; at most one best candidate.
    fn lookup<'a>(&'a self, sentence: &'a str) -> DetectorFuture<'a, PaperMatch>;
}

/// Looks a sentence up via a general web search; yields the first result URL.
pub trait WebDetector: Send + Sync {
    fn name(&self) -> &str;

    fn lookup<'a>(&'a self, sentence: &'a str) -> DetectorFuture<'a, String>;
}
