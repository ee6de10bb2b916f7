mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod llm;
mod pipeline;
mod search;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Context as _;
use clap::Parser;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tracing::{error, info, warn, Level};

use cli::{Cli, Command};
use config::Config;
use pipeline::Pipeline;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // Load env
    let _ = dotenv::dotenv();

    match cli.command() {
        Command::Run { queries, limit } => run_batch(queries, limit as usize).await,
        Command::Bot => run_bot().await,
    }
}

async fn run_batch(queries: Vec<String>, limit: usize) -> anyhow::Result<()> {
    let config = Config::from_env().map(|c| c.with_search_limit(limit));

    let queries = if queries.is_empty() {
        let product = config
            .as_ref()
            .map(|c| c.reference_product.as_str())
            .unwrap_or(config::DEFAULT_PRODUCT);
        config::default_queries(product)
    } else {
        queries
    };

    let outcome = batch::run(config, &queries, Pipeline::from_config).await?;

    let stdout = std::io::stdout();
    batch::write_report(&mut stdout.lock(), &outcome).context("Failed to write report")?;
    Ok(())
}

async fn run_bot() -> anyhow::Result<()> {
    let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Missing provider keys are reported per command; the bot still starts.
    let app_state = AppState::new(Config::from_env());
    match &app_state.pipeline {
        Ok(_) => info!("Research pipeline initialized"),
        Err(reason) => warn!(%reason, "Research pipeline unavailable"),
    }

    let intents = serenity::GatewayIntents::GUILDS;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::research()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(ctx, &framework.options().commands)
                        .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting market research bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    client.start().await.map_err(|e| {
        error!("Client error: {}", e);
        anyhow::anyhow!("Discord client stopped: {}", e)
    })
}
