//! DuckDuckGo web search tool

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("query", ParamKind::Text),
    ParamSpec::optional("domain", ParamKind::Text),
];

const SEARCH_URL: &str = "https://html.duckduckgo.com/html";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESULTS: usize = 5;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0.0.0";

/// One parsed search hit
#[derive(Debug, Clone)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

/// Searches the web via DuckDuckGo's HTML endpoint and returns ranked
/// result snippets. An optional domain filter narrows the query with a
/// `site:` operator.
pub struct WebSearch {
    client: Client,
}

impl WebSearch {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    async fn fetch_html(&self, query: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", query), ("kl", "wt-wt")])
            .send()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ToolError::UpstreamFailure {
                message: format!("search returned HTTP {}", response.status().as_u16()),
            });
        }

        response.text().await.map_err(|e| ToolError::UpstreamFailure {
            message: e.to_string(),
        })
    }

    fn parse_results(html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        // These selectors are static and known-valid.
        let result_sel = Selector::parse("div.result").unwrap();
        let link_sel = Selector::parse("a.result__a").unwrap();
        let snippet_sel = Selector::parse("a.result__snippet").unwrap();

        let mut results = Vec::new();
        for element in document.select(&result_sel) {
            let link = match element.select(&link_sel).next() {
                Some(link) => link,
                None => continue,
            };
            let snippet = match element.select(&snippet_sel).next() {
                Some(snippet) => snippet,
                None => continue,
            };

            let raw_url = link.value().attr("href").unwrap_or_default();
            results.push(SearchResult {
                title: link.text().collect::<String>().trim().to_string(),
                url: unwrap_redirect(raw_url),
                snippet: snippet.text().collect::<String>().trim().to_string(),
            });

            if results.len() >= MAX_RESULTS {
                break;
            }
        }
        results
    }

    fn format_results(results: &[SearchResult]) -> String {
        let mut lines = Vec::with_capacity(results.len());
        for (idx, result) in results.iter().enumerate() {
            lines.push(format!(
                "{}. {} ({})\n{}",
                idx + 1,
                result.title,
                result.url,
                result.snippet
            ));
        }
        lines.join("\n\n")
    }

    async fn run(&self, query: &str, domain: Option<&str>) -> Result<String, ToolError> {
        let effective_query = match domain {
            Some(domain) if !domain.is_empty() => format!("{} site:{}", query, domain),
            _ => query.to_string(),
        };

        let html = self.fetch_html(&effective_query).await?;
        let results = Self::parse_results(&html);
        debug!(query = %effective_query, hits = results.len(), "web search");

        if results.is_empty() {
            return Err(ToolError::UpstreamFailure {
                message: format!("no search results for: {}", effective_query),
            });
        }

        Ok(Self::format_results(&results))
    }
}

/// DuckDuckGo wraps result links in a redirect; recover the target URL.
fn unwrap_redirect(raw: &str) -> String {
    // Relative form: //duckduckgo.com/l/?uddg=<encoded>
    let absolute = if raw.starts_with("//") {
        format!("https:{}", raw)
    } else {
        raw.to_string()
    };

    if let Ok(parsed) = Url::parse(&absolute) {
        if parsed.domain() == Some("duckduckgo.com") {
            if let Some((_, target)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
                return target.into_owned();
            }
        }
    }
    absolute
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web and return ranked result snippets (title, url, excerpt). Optional second argument restricts results to one domain"
    }

    fn params(&self) -> &[ParamSpec] {
        PARAMS
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let query = match call.text_arg("query") {
            Ok(query) => query,
            Err(error) => return ToolResult::error(error),
        };
        self.run(query, call.text_arg_opt("domain")).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r##"
        <div class="result">
          <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage">Example Title</a>
          <a class="result__snippet" href="#">An example snippet.</a>
        </div>
        <div class="result">
          <a class="result__a" href="https://direct.example.org/">Direct Hit</a>
          <a class="result__snippet" href="#">Another snippet.</a>
        </div>
    "##;

    #[test]
    fn parses_results_and_unwraps_redirects() {
        let results = WebSearch::parse_results(SAMPLE_HTML);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Example Title");
        assert_eq!(results[0].url, "https://example.com/page");
        assert_eq!(results[1].url, "https://direct.example.org/");
    }

    #[test]
    fn formats_ranked_output() {
        let results = WebSearch::parse_results(SAMPLE_HTML);
        let formatted = WebSearch::format_results(&results);
        assert!(formatted.starts_with("1. Example Title (https://example.com/page)"));
        assert!(formatted.contains("2. Direct Hit"));
    }

    #[test]
    fn caps_results_at_limit() {
        let many: String = (0..10)
            .map(|i| {
                format!(
                    r##"<div class="result"><a class="result__a" href="https://e{i}.com/">T{i}</a><a class="result__snippet" href="#">S{i}</a></div>"##
                )
            })
            .collect();
        assert_eq!(WebSearch::parse_results(&many).len(), MAX_RESULTS);
    }
}
