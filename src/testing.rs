//! In-memory gateways and observers for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::llm::GenerationGateway;
use crate::pipeline::{PipelineEvent, PipelineObserver};
use crate::search::SearchGateway;

/// Canned results per query; records every call.
#[derive(Default)]
pub struct MockSearch {
    results: HashMap<String, Vec<String>>,
    calls: Mutex<Vec<(String, usize)>>,
    fail: bool,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, snippets: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            snippets.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchGateway for MockSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        if self.fail {
            return Err(Error::provider("Tavily", "HTTP 401 Unauthorized"));
        }
        Ok(self.results.get(query).cloned().unwrap_or_default())
    }
}

/// Replies in order; an `Err` entry fails that call. Runs dry with empty strings.
pub struct MockLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationGateway for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<PipelineEvent>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl PipelineObserver for Recorder {
    async fn on_event(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
