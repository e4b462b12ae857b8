//! Web lookup backed by the DuckDuckGo HTML endpoint.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::{DetectorError, DetectorFuture, WebDetector};
use crate::rate_limit::Pacer;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

static RESULT_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.result__a").unwrap());

/// Web detector performing an exact-phrase search against the HTML search
/// endpoint and returning the first organic result link.
///
/// Every lookup goes through the injected [`Pacer`] first; the provider's use
/// policy requires a pause between queries and skipping it risks lockout.
/// Lookups are serialized by the aggregator, never concurrent.
pub struct HtmlWebSearch {
    client: reqwest::Client,
    pacer: Arc<Pacer>,
    timeout: Duration,
}

impl HtmlWebSearch {
    pub fn new(client: reqwest::Client, pacer: Arc<Pacer>, timeout: Duration) -> Self {
        Self {
            client,
            pacer,
            timeout,
        }
    }

    async fn search(&self, sentence: &str) -> Result<Option<String>, DetectorError> {
        self.pacer.acquire().await;

        let query = format!("\"{}\"", sentence);
        let resp = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[("q", query.as_str()), ("kl", "us-en")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DetectorError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DetectorError::Request(format!("HTTP {}", resp.status())));
        }

        let html = resp
            .text()
            .await
            .map_err(|e| DetectorError::Malformed(e.to_string()))?;

        Ok(first_result_url(&html))
    }
}

impl WebDetector for HtmlWebSearch {
    fn name(&self) -> &str {
        "Web search"
    }

    fn lookup<'a>(&'a self, sentence: &'a str) -> DetectorFuture<'a, String> {
        Box::pin(self.search(sentence))
    }
}

/// Extract the first organic result URL from a result page.
fn first_result_url(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_redirect)
        .next()
}

/// Result links are usually redirect URLs carrying the target in the `uddg`
/// query parameter; unwrap it. Plain http(s) links pass through.
fn resolve_redirect(href: &str) -> Option<String> {
    if let Some(pos) = href.find("uddg=") {
        let encoded = &href[pos + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        return match urlencoding::decode(encoded) {
            Ok(Cow::Borrowed(s)) => Some(s.to_string()),
            Ok(Cow::Owned(s)) => Some(s),
            Err(_) => None,
        };
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}

/// A web detector that reports nothing, for runs with web search turned off.
pub struct WebSearchDisabled;

impl WebDetector for WebSearchDisabled {
    fn name(&self) -> &str {
        "Web search (disabled)"
    }

    fn lookup<'a>(&'a self, _sentence: &'a str) -> DetectorFuture<'a, String> {
        Box::pin(async { Ok(None) })
    }
}
