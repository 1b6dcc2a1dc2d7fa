use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

/// A prior case retrieved from the search provider, used to ground a drafted
/// verdict. Read-only and transient.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceCase {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<ReferenceCase>,
}

/// Appended to every lookup so generic case titles resolve to RERA matters.
const QUERY_SUFFIX: &str = " RERA real estate legal case";

/// Maximum reference cases retained per lookup.
const MAX_RESULTS: usize = 3;

pub struct CaseSearch {
    client: reqwest::Client,
    api_key: String,
}

impl CaseSearch {
    pub fn from_env() -> Result<Self> {
        let api_key = dotenv::var("SERPAPI_KEY").context("SERPAPI_KEY required")?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, api_key })
    }

    /// Look up prior cases matching a free-text title.
    ///
    /// An empty title performs no network call. Provider failures and
    /// malformed responses degrade to an empty list; this boundary never
    /// surfaces an error to the caller.
    pub async fn lookup(&self, case_title: &str) -> Vec<ReferenceCase> {
        let title = case_title.trim();
        if title.is_empty() {
            return Vec::new();
        }

        match self.fetch(title).await {
            Ok(cases) => {
                info!(title, count = cases.len(), "reference case lookup");
                cases
            }
            Err(e) => {
                warn!(title, "reference case lookup failed: {e:#}");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, title: &str) -> Result<Vec<ReferenceCase>> {
        let query = build_query(title);
        let num = MAX_RESULTS.to_string();
        let resp = self
            .client
            .get("https://serpapi.com/search")
            .query(&[
                ("q", query.as_str()),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("search request failed")?;

        let body: SearchResponse = resp.json().await.context("malformed search response")?;
        Ok(truncate_results(body.organic_results))
    }
}

fn build_query(title: &str) -> String {
    format!("{}{}", title, QUERY_SUFFIX)
}

fn truncate_results(mut results: Vec<ReferenceCase>) -> Vec<ReferenceCase> {
    results.truncate(MAX_RESULTS);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_title_short_circuits_without_a_request() {
        let search = CaseSearch {
            client: reqwest::Client::new(),
            // A key that would fail any real request; the guard must return
            // before one is sent.
            api_key: "unused".to_string(),
        };
        assert!(search.lookup("").await.is_empty());
        assert!(search.lookup("   \n").await.is_empty());
    }

    #[test]
    fn query_carries_domain_suffix() {
        assert_eq!(
            build_query("Sharma v. Horizon Builders"),
            "Sharma v. Horizon Builders RERA real estate legal case"
        );
    }

    #[test]
    fn parses_organic_results_and_caps_at_three() {
        let body = r#"{
            "organic_results": [
                {"title": "A v. B", "link": "https://example.com/a", "snippet": "order upheld"},
                {"title": "C v. D", "link": "https://example.com/c", "snippet": "delay penalty"},
                {"title": "E v. F", "link": "https://example.com/e", "snippet": "refund granted"},
                {"title": "G v. H", "link": "https://example.com/g", "snippet": "dismissed"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let cases = truncate_results(parsed.organic_results);
        assert_eq!(cases.len(), 3);
        assert!(cases.iter().all(|c| !c.title.is_empty() && !c.link.is_empty()));
        assert_eq!(cases[0].snippet, "order upheld");
    }

    #[test]
    fn missing_organic_results_is_empty_not_an_error() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"search_metadata": {"status": "Error"}}"#).unwrap();
        assert!(parsed.organic_results.is_empty());
    }

    #[test]
    fn snippet_is_optional() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"organic_results": [{"title": "A v. B", "link": "https://example.com/a"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.organic_results[0].snippet, "");
    }
}
