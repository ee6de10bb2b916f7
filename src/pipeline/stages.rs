use tracing::debug;

use super::prompts;
use crate::error::Result;
use crate::llm::GenerationGateway;

fn is_list_marker(c: char) -> bool {
    c == '-' || c == '•' || c.is_whitespace()
}

/// Turn a bullet-list completion into competitor names.
///
/// One entry per non-blank line, in line order, with bullet markers and
/// surrounding whitespace stripped. A line holding only markers yields an empty
/// entry. Duplicates are kept.
pub fn parse_competitor_list(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_matches(is_list_marker).to_string())
        .collect()
}

pub async fn extract_competitors(
    llm: &dyn GenerationGateway,
    snippets: &[String],
) -> Result<Vec<String>> {
    let raw = llm.generate(&prompts::competitor_extraction(snippets)).await?;
    debug!(raw_len = raw.len(), "Competitor extraction response");
    Ok(parse_competitor_list(&raw))
}

pub async fn extract_features_and_prices(
    llm: &dyn GenerationGateway,
    competitors: &[String],
) -> Result<String> {
    llm.generate(&prompts::feature_price_extraction(competitors))
        .await
}

pub async fn synthesize_report(
    llm: &dyn GenerationGateway,
    competitors: &[String],
    features_prices: &str,
    product: &str,
) -> Result<String> {
    llm.generate(&prompts::report_synthesis(competitors, features_prices, product))
        .await
}
