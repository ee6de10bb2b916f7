//! Prompt templates for the three generation stages.
//!
//! Placeholders are `{results}`, `{competitors}`, `{features_prices}` and `{product}`.

pub const COMPETITOR_EXTRACTION: &str = r#"From the following search results, extract smartwatch competitor models (brand + model names).
Ignore article/blog titles and only list smartwatch names.

Search Results:
{results}

Return competitors as a bullet list.
"#;

pub const FEATURE_PRICE_EXTRACTION: &str = r#"For each of the following smartwatches, provide:
- Key Features (3–5 points)
- Approximate Price Range (in USD and PKR if available)

Smartwatches:
{competitors}

Return as structured markdown text.
"#;

pub const REPORT_SYNTHESIS: &str = r#"You are a market research analyst.

Competitors:
{competitors}

Features & Prices:
{features_prices}

Based on this, write a final **Market Research Report** with:
1. Competitor List
2. Features & Price Comparison
3. Strategic Suggestions for {product}
"#;

/// Substitute `{key}` placeholders in a single pass over the template.
///
/// Values are copied verbatim; placeholder-like text inside a value is never expanded.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = vars.iter().find_map(|(key, value)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(*key))
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn competitor_extraction(snippets: &[String]) -> String {
    let results = snippets.join("\n");
    fill(COMPETITOR_EXTRACTION, &[("results", results.as_str())])
}

pub fn feature_price_extraction(competitors: &[String]) -> String {
    let competitors = competitors.join("\n");
    fill(FEATURE_PRICE_EXTRACTION, &[("competitors", competitors.as_str())])
}

pub fn report_synthesis(competitors: &[String], features_prices: &str, product: &str) -> String {
    let competitors = competitors.join("\n");
    fill(
        REPORT_SYNTHESIS,
        &[
            ("competitors", competitors.as_str()),
            ("features_prices", features_prices),
            ("product", product),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_are_newline_joined() {
        let prompt = competitor_extraction(&["one".to_string(), "two".to_string()]);
        assert!(prompt.contains("Search Results:\none\ntwo\n"));
        assert!(prompt.contains("bullet list"));
        assert!(!prompt.contains("{results}"));
    }

    #[test]
    fn feature_prompt_lists_each_competitor() {
        let prompt = feature_price_extraction(&["Watch X".to_string(), "Watch Y".to_string()]);
        assert!(prompt.contains("Smartwatches:\nWatch X\nWatch Y\n"));
        assert!(prompt.contains("USD and PKR"));
    }

    #[test]
    fn report_prompt_embeds_all_inputs() {
        let prompt = report_synthesis(
            &["Watch X".to_string()],
            "## Watch X\n- GPS {not a placeholder}",
            "Nexus Smartwatch Pro 2",
        );
        assert!(prompt.starts_with("You are a market research analyst."));
        assert!(prompt.contains("Competitors:\nWatch X\n"));
        assert!(prompt.contains("- GPS {not a placeholder}"));
        assert!(prompt.contains("3. Strategic Suggestions for Nexus Smartwatch Pro 2"));
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let prompt = report_synthesis(
            &["Watch {features_prices}".to_string()],
            "BLOB {competitors}",
            "Band {product}",
        );
        assert!(prompt.contains("Competitors:\nWatch {features_prices}\n"));
        assert!(prompt.contains("Features & Prices:\nBLOB {competitors}\n"));
        assert!(prompt.contains("Strategic Suggestions for Band {product}"));
        assert_eq!(prompt.matches("BLOB").count(), 1);
    }

    #[test]
    fn unknown_braces_are_left_alone() {
        assert_eq!(fill("a {x} {y", &[("x", "1")]), "a 1 {y");
        assert_eq!(fill("{{x}}", &[("x", "1")]), "{1}");
    }
}
