pub mod prompts;
pub mod stages;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::llm::{GenerationGateway, LlmClient};
use crate::search::{SearchGateway, TavilyClient};

/// Pipeline states, visited strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    ExtractCompetitors,
    ExtractFeatures,
    Synthesize,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Search => Stage::ExtractCompetitors,
            Stage::ExtractCompetitors => Stage::ExtractFeatures,
            Stage::ExtractFeatures => Stage::Synthesize,
            Stage::Synthesize | Stage::Done => Stage::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Search => "search",
            Stage::ExtractCompetitors => "competitor extraction",
            Stage::ExtractFeatures => "feature/price extraction",
            Stage::Synthesize => "report synthesis",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Progress reported while a run is underway.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Searching(String),
    Competitors(Vec<String>),
    FeaturesPrices(String),
    Report(String),
}

/// Receives intermediate results as each stage completes.
#[async_trait]
pub trait PipelineObserver: Send + Sync {
    async fn on_event(&self, event: &PipelineEvent);
}

#[async_trait]
impl PipelineObserver for () {
    async fn on_event(&self, _event: &PipelineEvent) {}
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    pub competitors: Vec<String>,
    pub features_prices: String,
    pub report: String,
    pub snippet_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct Pipeline {
    search: Arc<dyn SearchGateway>,
    llm: Arc<dyn GenerationGateway>,
    search_limit: usize,
    reference_product: String,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchGateway>,
        llm: Arc<dyn GenerationGateway>,
        search_limit: usize,
        reference_product: impl Into<String>,
    ) -> Self {
        Self {
            search,
            llm,
            search_limit,
            reference_product: reference_product.into(),
        }
    }

    /// Wire the Tavily and Groq clients from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(TavilyClient::new(config)?),
            Arc::new(LlmClient::new(config)?),
            config.search_limit,
            config.reference_product.clone(),
        ))
    }

    /// Run every stage in order. The first failure ends the run.
    pub async fn run(
        &self,
        queries: &[String],
        observer: &dyn PipelineObserver,
    ) -> Result<ResearchOutcome> {
        let started_at = Utc::now();

        let mut stage = Stage::Search;
        let snippets = self
            .search_all(queries, observer)
            .await
            .map_err(|e| fail(e, stage))?;

        stage = stage.next();
        let competitors = stages::extract_competitors(self.llm.as_ref(), &snippets)
            .await
            .map_err(|e| fail(e, stage))?;
        info!(count = competitors.len(), ?competitors, "Competitors found");
        observer
            .on_event(&PipelineEvent::Competitors(competitors.clone()))
            .await;

        stage = stage.next();
        let features_prices = stages::extract_features_and_prices(self.llm.as_ref(), &competitors)
            .await
            .map_err(|e| fail(e, stage))?;
        observer
            .on_event(&PipelineEvent::FeaturesPrices(features_prices.clone()))
            .await;

        stage = stage.next();
        let report = stages::synthesize_report(
            self.llm.as_ref(),
            &competitors,
            &features_prices,
            &self.reference_product,
        )
        .await
        .map_err(|e| fail(e, stage))?;
        observer.on_event(&PipelineEvent::Report(report.clone())).await;

        let finished_at = Utc::now();
        info!(
            snippets = snippets.len(),
            competitors = competitors.len(),
            report_len = report.len(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "Research run complete"
        );

        Ok(ResearchOutcome {
            competitors,
            features_prices,
            report,
            snippet_count: snippets.len(),
            started_at,
            finished_at,
        })
    }

    /// Search each non-blank query in order and flatten the snippets.
    async fn search_all(
        &self,
        queries: &[String],
        observer: &dyn PipelineObserver,
    ) -> Result<Vec<String>> {
        let mut all = Vec::new();
        for query in queries.iter().map(|q| q.trim()).filter(|q| !q.is_empty()) {
            observer
                .on_event(&PipelineEvent::Searching(query.to_string()))
                .await;
            let results = self.search.search(query, self.search_limit).await?;
            all.extend(results);
        }
        Ok(all)
    }
}

fn fail(err: crate::error::Error, stage: Stage) -> crate::error::Error {
    error!(%stage, error = %err, "Pipeline stage failed");
    err.in_stage(stage)
}
