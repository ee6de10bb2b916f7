use thiserror::Error;

use crate::pipeline::Stage;

/// Errors raised while configuring or running a research pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting (usually a provider credential) is missing.
    #[error("Missing {0} in environment or .env")]
    Configuration(String),

    /// The search or generation provider rejected or failed the request.
    #[error("{provider} request failed: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The generation provider throttled the request (HTTP 429).
    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited {
        provider: &'static str,
        message: String,
    },

    /// A pipeline stage failed; the run stops here.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Error::Provider {
            provider,
            message: message.into(),
        }
    }

    pub fn in_stage(self, stage: Stage) -> Self {
        Error::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The error without any stage wrapper.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
