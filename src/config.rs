use crate::error::{Error, Result};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_PRODUCT: &str = "Nexus Smartwatch Pro 2";
pub const DEFAULT_SEARCH_LIMIT: usize = 6;

/// Provider credentials and settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub tavily_api_key: String,
    pub tavily_base_url: String,
    pub model: String,
    /// Product the strategic suggestions are written for.
    pub reference_product: String,
    pub search_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let groq_api_key = get("GROQ_API_KEY");
        let tavily_api_key = get("TAVILY_API_KEY");

        let (groq_api_key, tavily_api_key) = match (groq_api_key, tavily_api_key) {
            (Some(groq), Some(tavily)) => (groq, tavily),
            (groq, tavily) => {
                let missing: Vec<&str> = [
                    ("GROQ_API_KEY", groq.is_none()),
                    ("TAVILY_API_KEY", tavily.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                return Err(Error::Configuration(missing.join(", ")));
            }
        };

        Ok(Self {
            groq_api_key,
            groq_base_url: get("GROQ_BASE_URL").unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            tavily_api_key,
            tavily_base_url: get("TAVILY_BASE_URL").unwrap_or_else(|| TAVILY_BASE_URL.to_string()),
            model: DEFAULT_MODEL.to_string(),
            reference_product: get("REFERENCE_PRODUCT")
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            search_limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }
}

/// The three stock queries, with the reference product spliced into the last one.
pub fn default_queries(product: &str) -> Vec<String> {
    vec![
        "best smartwatches 2025".to_string(),
        "top smartwatches Pakistan price".to_string(),
        format!("smartwatch competitors to {}", product),
    ]
}
