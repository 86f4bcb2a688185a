//! Wikipedia article search tool

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const PARAMS: &[ParamSpec] = &[ParamSpec::required("query", ParamKind::Text)];

const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ARTICLES: usize = 2;
const USER_AGENT: &str = concat!("gaia-agent/", env!("CARGO_PKG_VERSION"));

/// Searches Wikipedia and returns up to two article summaries, each
/// tagged with its source title.
pub struct WikiSearch {
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    pages: std::collections::HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    extract: Option<String>,
}

impl WikiSearch {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>, ToolError> {
        let response: SearchResponse = self
            .client
            .get(API_URL)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "2"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: format!("failed to parse search response: {}", e),
            })?;

        let titles: Vec<String> = response
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default();

        Ok(titles)
    }

    async fn fetch_extract(&self, title: &str) -> Result<Option<String>, ToolError> {
        let response: ExtractResponse = self
            .client
            .get(API_URL)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("titles", title),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: e.to_string(),
            })?
            .json()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: format!("failed to parse extract response: {}", e),
            })?;

        let summary = response.query.and_then(|q| {
            q.pages.into_values().find_map(|page| {
                page.extract
                    .map(|extract| format!("Source: {}\n{}", page.title, extract.trim()))
            })
        });

        Ok(summary)
    }

    async fn run(&self, query: &str) -> Result<String, ToolError> {
        let titles = self.search_titles(query).await?;
        debug!(query, hits = titles.len(), "wikipedia search");

        if titles.is_empty() {
            return Err(ToolError::NoResults {
                query: query.to_string(),
            });
        }

        let mut summaries = Vec::new();
        for title in titles.iter().take(MAX_ARTICLES) {
            if let Some(summary) = self.fetch_extract(title).await? {
                summaries.push(summary);
            }
        }

        if summaries.is_empty() {
            return Err(ToolError::NoResults {
                query: query.to_string(),
            });
        }

        Ok(summaries.join("\n\n"))
    }
}

impl Default for WikiSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WikiSearch {
    fn name(&self) -> &str {
        "wiki_search"
    }

    fn description(&self) -> &str {
        "Search Wikipedia and return up to 2 article summaries, each tagged with its source title"
    }

    fn params(&self) -> &[ParamSpec] {
        PARAMS
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let query = match call.text_arg("query") {
            Ok(query) => query,
            Err(error) => return ToolResult::error(error),
        };
        self.run(query).await.into()
    }
}
