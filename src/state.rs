use std::sync::Arc;

use crate::config::{self, Config};
use crate::pipeline::Pipeline;

pub struct AppState {
    /// Ready pipeline, or the reason it could not be built (shown to users on each run).
    pub pipeline: Result<Arc<Pipeline>, String>,
    pub default_queries: Vec<String>,
}

impl AppState {
    pub fn new(config: crate::error::Result<Config>) -> Self {
        let product = config
            .as_ref()
            .map(|c| c.reference_product.clone())
            .unwrap_or_else(|_| config::DEFAULT_PRODUCT.to_string());

        let pipeline = config
            .and_then(|c| Pipeline::from_config(&c))
            .map(Arc::new)
            .map_err(|e| e.to_string());

        Self {
            pipeline,
            default_queries: config::default_queries(&product),
        }
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
