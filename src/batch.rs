use std::io::Write;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineEvent, PipelineObserver, ResearchOutcome};

pub const REPORT_BANNER: &str = "----- FINAL REPORT -----";

/// Echoes progress to stdout the way the batch runner always has.
struct ConsoleObserver;

#[async_trait]
impl PipelineObserver for ConsoleObserver {
    async fn on_event(&self, event: &PipelineEvent) {
        if let Some(line) = progress_line(event) {
            println!("{}", line);
        }
    }
}

/// Progress echo for stdout; the report itself is written by `write_report`.
fn progress_line(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::Searching(query) => Some(format!("[search] {}", query)),
        PipelineEvent::Competitors(names) => Some(format!("[info] competitors found: {:?}", names)),
        PipelineEvent::FeaturesPrices(_) | PipelineEvent::Report(_) => None,
    }
}

/// Resolve configuration, build the pipeline and run it once.
///
/// A configuration error is returned before `build` is called, so no gateway
/// is ever constructed or contacted.
pub async fn run<F>(config: Result<Config>, queries: &[String], build: F) -> Result<ResearchOutcome>
where
    F: FnOnce(&Config) -> Result<Pipeline>,
{
    let config = config?;
    let pipeline = build(&config)?;
    pipeline.run(queries, &ConsoleObserver).await
}

pub fn write_report<W: Write>(out: &mut W, outcome: &ResearchOutcome) -> std::io::Result<()> {
    writeln!(out, "\n\n{}\n", REPORT_BANNER)?;
    writeln!(out, "{}", outcome.report)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::error::Error;
    use crate::testing::{MockLlm, MockSearch};

    #[tokio::test]
    async fn missing_credential_stops_before_any_gateway() {
        let search = Arc::new(MockSearch::new().with("q1", &["snippet"]));
        let llm = Arc::new(MockLlm::new(vec![]));
        let config = Config::from_lookup(|key| match key {
            "TAVILY_API_KEY" => Some("t".to_string()),
            _ => None,
        });

        let (s, l) = (search.clone(), llm.clone());
        let err = run(config, &["q1".to_string()], move |_| {
            Ok(Pipeline::new(s, l, 6, "Nexus Smartwatch Pro 2"))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Configuration(ref key) if key == "GROQ_API_KEY"));
        assert!(search.calls().is_empty());
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn configured_run_uses_config_limit() {
        let search = Arc::new(MockSearch::new().with("q1", &["a", "b"]));
        let llm = Arc::new(MockLlm::new(vec![
            Ok("- Watch X".to_string()),
            Ok("features".to_string()),
            Ok("report body".to_string()),
        ]));
        let config = Config::from_lookup(|key| match key {
            "GROQ_API_KEY" | "TAVILY_API_KEY" => Some("k".to_string()),
            _ => None,
        })
        .map(|c| c.with_search_limit(2));

        let (s, l) = (search.clone(), llm.clone());
        let outcome = run(config, &["q1".to_string()], move |config| {
            Ok(Pipeline::new(s, l, config.search_limit, config.reference_product.clone()))
        })
        .await
        .unwrap();

        assert_eq!(search.calls(), vec![("q1".to_string(), 2)]);
        assert_eq!(outcome.report, "report body");
    }

    #[test]
    fn only_search_and_competitor_progress_is_echoed() {
        assert_eq!(
            progress_line(&PipelineEvent::Searching("q1".to_string())).as_deref(),
            Some("[search] q1")
        );
        assert_eq!(
            progress_line(&PipelineEvent::Competitors(vec!["Watch X".to_string()])).as_deref(),
            Some(r#"[info] competitors found: ["Watch X"]"#)
        );
        assert!(progress_line(&PipelineEvent::FeaturesPrices("md".to_string())).is_none());
        assert!(progress_line(&PipelineEvent::Report("md".to_string())).is_none());
    }

    #[test]
    fn report_follows_banner() {
        let outcome = ResearchOutcome {
            competitors: vec!["Watch X".to_string()],
            features_prices: String::new(),
            report: "# Market Research Report".to_string(),
            snippet_count: 1,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        let mut out = Vec::new();
        write_report(&mut out, &outcome).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\n\n----- FINAL REPORT -----\n\n# Market Research Report\n"
        );
    }
}
