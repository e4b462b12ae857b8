//! Academic lookup backed by the Semantic Scholar paper-search API.

use std::time::Duration;

use serde::Deserialize;

use super::{AcademicDetector, DetectorError, DetectorFuture};
use crate::types::PaperMatch;

const SEARCH_ENDPOINT: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

/// Online academic detector querying the Semantic Scholar graph API with an
/// exact-phrase query, a field selection of title/authors/url, and a result
/// limit of one.
pub struct SemanticScholar {
    client: reqwest::Client,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    data: Vec<PaperRecord>,
}

#[derive(Deserialize)]
struct PaperRecord {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<AuthorRecord>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct AuthorRecord {
    name: Option<String>,
}

impl SemanticScholar {
    pub fn new(client: reqwest::Client, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            api_key,
            timeout,
        }
    }

    async fn search(&self, sentence: &str) -> Result<Option<PaperMatch>, DetectorError> {
        let query = format!("\"{}\"", sentence);
        let mut request = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("query", query.as_str()),
                ("fields", "title,authors,url"),
                ("limit", "1"),
            ])
            .timeout(self.timeout);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| DetectorError::Request(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DetectorError::Request(format!("HTTP {}", resp.status())));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| DetectorError::Malformed(e.to_string()))?;

        if body.total == 0 {
            return Ok(None);
        }
        let Some(paper) = body.data.into_iter().next() else {
            return Ok(None);
        };
        let Some(title) = paper.title else {
            return Ok(None);
        };

        let authors = paper
            .authors
            .into_iter()
            .filter_map(|a| a.name)
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Some(PaperMatch {
            title,
            authors,
            url: paper.url,
        }))
    }
}

impl AcademicDetector for SemanticScholar {
    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    fn lookup<'a>(&'a self, sentence: &'a str) -> DetectorFuture<'a, PaperMatch> {
        Box::pin(self.search(sentence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_results_parses_into_paper_match() {
        let json = r#"{
            "total": 3,
            "data": [{
                "title": "A Study of Things",
                "authors": [{"name": "A. Author"}, {"name": "B. Writer"}],
                "url": "https://www.semanticscholar.org/paper/abc"
            }]
        }"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.total, 3);
        let paper = &body.data[0];
        assert_eq!(paper.title.as_deref(), Some("A Study of Things"));
        let authors = paper
            .authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        assert_eq!(authors, "A. Author, B. Writer");
    }

    #[test]
    fn empty_response_fields_default() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.total, 0);
        assert!(body.data.is_empty());
    }

    #[test]
    fn author_entries_without_names_are_skipped() {
        let json = r#"{"total": 1, "data": [{"title": "T", "authors": [{"name": null}, {"name": "C. Coder"}]}]}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let authors = body.data[0]
            .authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .collect::<Vec<_>>()
            .join(", ");
        assert_eq!(authors, "C. Coder");
    }
}
