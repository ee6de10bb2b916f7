use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

const PROVIDER: &str = "Tavily";

/// Something that turns a query into ranked text snippets.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Return at most `limit` snippets, in provider order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    content: String,
}

pub struct TavilyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| Error::provider(PROVIDER, format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.tavily_base_url.clone(),
            api_key: config.tavily_api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchGateway for TavilyClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if limit == 0 {
            return Err(Error::provider(PROVIDER, "max_results must be at least 1"));
        }
        debug!(query, limit, "Tavily search");

        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": limit,
        });

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::provider(PROVIDER, format!("HTTP {}: {}", status, text)));
        }

        let snippets = parse_snippets(&text, limit)?;
        info!(query, count = snippets.len(), "Tavily search complete");
        Ok(snippets)
    }
}

fn parse_snippets(body: &str, limit: usize) -> Result<Vec<String>> {
    let data: TavilyResponse = serde_json::from_str(body)
        .map_err(|e| Error::provider(PROVIDER, format!("invalid response: {}", e)))?;

    Ok(data
        .results
        .into_iter()
        .map(|r| r.content)
        .take(limit)
        .collect())
}
