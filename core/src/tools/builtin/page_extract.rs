//! Web page plain-text extraction tool

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

const PARAMS: &[ParamSpec] = &[ParamSpec::required("url", ParamKind::Text)];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_TEXT_LEN: usize = 16_000;
const USER_AGENT: &str = concat!("gaia-agent/", env!("CARGO_PKG_VERSION"));

/// Fetches a web page and returns its visible text with markup stripped.
///
/// The URL scheme is validated before any network activity: non-http(s)
/// schemes are rejected outright.
pub struct PageExtractor {
    client: Client,
}

impl PageExtractor {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    fn validate_url(raw: &str) -> Result<Url, ToolError> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).map_err(|_| ToolError::InvalidUrl {
            url: trimmed.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ToolError::InvalidUrl {
                url: trimmed.to_string(),
            });
        }
        Ok(parsed)
    }

    /// Strip markup, scripts and styles; collapse whitespace runs.
    fn extract_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let body_sel = Selector::parse("body").unwrap();

        let mut text = String::new();
        if let Some(body) = document.select(&body_sel).next() {
            for node in body.descendants() {
                let piece = match node.value().as_text() {
                    Some(piece) => piece,
                    None => continue,
                };
                let in_skipped = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .map(|e| matches!(e.name(), "script" | "style" | "noscript"))
                        .unwrap_or(false)
                });
                if in_skipped {
                    continue;
                }
                let piece = piece.trim();
                if !piece.is_empty() {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(piece);
                }
            }
        }

        if text.len() > MAX_TEXT_LEN {
            let mut cut = MAX_TEXT_LEN;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            text.push_str(" [truncated]");
        }
        text
    }

    async fn run(&self, raw_url: &str) -> Result<String, ToolError> {
        let url = Self::validate_url(raw_url)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ToolError::FetchFailure {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ToolError::FetchFailure {
                message: format!("{} returned HTTP {}", url, response.status().as_u16()),
            });
        }

        let html = response.text().await.map_err(|e| ToolError::FetchFailure {
            message: e.to_string(),
        })?;

        let text = Self::extract_text(&html);
        if text.is_empty() {
            return Err(ToolError::FetchFailure {
                message: format!("no text content found at {}", url),
            });
        }
        Ok(text)
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for PageExtractor {
    fn name(&self) -> &str {
        "page_extract"
    }

    fn description(&self) -> &str {
        "Fetch a web page by URL (http/https only) and return its plain text with markup stripped"
    }

    fn params(&self) -> &[ParamSpec] {
        PARAMS
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let url = match call.text_arg("url") {
            Ok(url) => url,
            Err(error) => return ToolResult::error(error),
        };
        self.run(url).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn rejects_non_http_scheme_without_fetching() {
        let tool = PageExtractor::new();
        let mut args = serde_json::Map::new();
        args.insert("url".to_string(), json!("ftp://example.com/file.txt"));
        let call = ToolCall::new("page_extract", args);

        match tool.execute(&call).await {
            ToolResult::Error {
                error: ToolError::InvalidUrl { url },
            } => assert_eq!(url, "ftp://example.com/file.txt"),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_and_hostless_urls() {
        assert!(PageExtractor::validate_url("not a url").is_err());
        assert!(PageExtractor::validate_url("file:///etc/passwd").is_err());
        assert!(PageExtractor::validate_url("https://example.com/page").is_ok());
    }

    #[test]
    fn strips_markup_scripts_and_styles() {
        let html = r#"
            <html><head><title>T</title><style>body { color: red; }</style></head>
            <body>
              <h1>Heading</h1>
              <script>var hidden = 1;</script>
              <p>First <b>bold</b> paragraph.</p>
            </body></html>
        "#;
        let text = PageExtractor::extract_text(html);
        assert!(text.contains("Heading"));
        assert!(text.contains("First"));
        assert!(text.contains("bold"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn truncates_very_long_pages() {
        let long_body = "word ".repeat(10_000);
        let html = format!("<html><body><p>{}</p></body></html>", long_body);
        let text = PageExtractor::extract_text(&html);
        assert!(text.len() <= MAX_TEXT_LEN + " [truncated]".len());
        assert!(text.ends_with("[truncated]"));
    }
}
