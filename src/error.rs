use std::time::Duration;
use thiserror::Error;

/// Failure classes for one call attempt. `Configuration`, `MissingField` and
/// `Timeout` are fatal to the attempt; `Transport` is retryable only by
/// starting a new attempt; `Extraction` is recovered locally with a pending
/// fallback outcome.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("invalid call configuration: {0}")]
    Configuration(String),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider response missing required field `{0}`")]
    MissingField(&'static str),

    #[error("outcome extraction failed: {0}")]
    Extraction(String),

    #[error("call did not end within {0:?}")]
    Timeout(Duration),
}

/// Pipeline stage in which a fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateSession,
    Dial,
    AwaitEnd,
    FetchTranscript,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::CreateSession => "session creation",
            Stage::Dial => "outbound dial",
            Stage::AwaitEnd => "status wait",
            Stage::FetchTranscript => "transcript fetch",
        };
        write!(f, "{name}")
    }
}

/// Terminal failure of a call attempt. No partial result accompanies it; the
/// phone call itself may already have been placed and billed, which callers
/// must log for reconciliation.
#[derive(Debug, Error)]
#[error("call attempt failed during {stage}: {source}")]
pub struct CallAttemptFailed {
    pub stage: Stage,
    #[source]
    pub source: CallError,
}

impl CallAttemptFailed {
    /// Adapter for `map_err` at stage boundaries in the orchestrator.
    pub fn at(stage: Stage) -> impl FnOnce(CallError) -> Self {
        move |source| Self { stage, source }
    }
}
