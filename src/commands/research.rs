use async_trait::async_trait;
use tracing::{info, warn};

use super::send_chunked;
use crate::error::Error;
use crate::pipeline::{PipelineEvent, PipelineObserver};
use crate::state::Context;

/// Posts each stage's output to the channel as soon as it arrives.
struct ChannelObserver<'a> {
    ctx: Context<'a>,
}

#[async_trait]
impl<'a> PipelineObserver for ChannelObserver<'a> {
    async fn on_event(&self, event: &PipelineEvent) {
        let text = render_event(event);
        if let Err(e) = send_chunked(&self.ctx, &text).await {
            warn!(error = %e, "Failed to post pipeline progress");
        }
    }
}

fn render_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::Searching(query) => format!("**Searching:** {}", query),
        PipelineEvent::Competitors(names) if names.is_empty() => {
            "**📌 Competitor Smartwatches**\n_No competitors found._".to_string()
        }
        PipelineEvent::Competitors(names) => {
            let mut out = String::from("**📌 Competitor Smartwatches**\n");
            for name in names {
                out.push_str(&format!("- {}\n", name));
            }
            out
        }
        PipelineEvent::FeaturesPrices(md) => format!("**💡 Features & Prices**\n{}", md),
        PipelineEvent::Report(md) => format!("**📊 Final Market Research Report**\n{}", md),
    }
}

/// Queries are separated by newlines or `;`. Nothing usable means the defaults.
fn parse_queries(input: Option<&str>, defaults: &[String]) -> Vec<String> {
    let queries: Vec<String> = input
        .unwrap_or("")
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect();

    if queries.is_empty() {
        defaults.to_vec()
    } else {
        queries
    }
}

/// Run market research over live web search
#[poise::command(slash_command)]
pub async fn run(
    ctx: Context<'_>,
    #[description = "Search queries, separated by ';' (defaults to the stock three)"]
    queries: Option<String>,
) -> Result<(), anyhow::Error> {
    let pipeline = match &ctx.data().pipeline {
        Ok(pipeline) => pipeline.clone(),
        Err(reason) => {
            ctx.say(format!("❌ {}", reason)).await?;
            return Ok(());
        }
    };

    let queries = parse_queries(queries.as_deref(), &ctx.data().default_queries);
    ctx.say(format!(
        "Running analysis over {} quer{}... please wait ⏳",
        queries.len(),
        if queries.len() == 1 { "y" } else { "ies" }
    ))
    .await?;

    info!(user = ctx.author().name, ?queries, "Research run started");

    let observer = ChannelObserver { ctx };
    match pipeline.run(&queries, &observer).await {
        Ok(outcome) => {
            let elapsed = outcome.finished_at - outcome.started_at;
            ctx.say(format!(
                "_Done in {}s · {} snippets · {} competitors · finished {}_",
                elapsed.num_seconds(),
                outcome.snippet_count,
                outcome.competitors.len(),
                outcome.finished_at.format("%Y-%m-%d %H:%M UTC")
            ))
            .await?;
        }
        Err(e) => {
            warn!(error = %e, "Research run failed");
            let hint = match e.root() {
                Error::RateLimited { .. } => "\nThe model provider is throttling requests; try again shortly.",
                _ => "",
            };
            ctx.say(format!("❌ {}{}", e, hint)).await?;
        }
    }

    Ok(())
}

/// Show the default search queries
#[poise::command(slash_command)]
pub async fn defaults(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let mut out = String::from("**Default queries**\n");
    for query in &ctx.data().default_queries {
        out.push_str(&format!("- {}\n", query));
    }
    ctx.say(out).await?;
    Ok(())
}
