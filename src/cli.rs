use clap::{Parser, Subcommand};

use crate::config::DEFAULT_SEARCH_LIMIT;

/// Competitor research from live web search and a hosted LLM
#[derive(Parser, Debug)]
#[command(name = "market-research", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the pipeline once and print the report to stdout
    Run {
        /// Search query (repeatable); defaults to the stock three
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Results fetched per query
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_SEARCH_LIMIT as u64,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        limit: u64,
    },
    /// Serve the interactive Discord command
    Bot,
}

impl Cli {
    /// Bare invocation behaves like `run` with defaults.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            queries: Vec::new(),
            limit: DEFAULT_SEARCH_LIMIT as u64,
        })
    }
}
