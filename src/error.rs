// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds the relay distinguishes. Per-feed kinds
/// (`FeedUnavailable`, `DeliveryFailed`) are caught and logged at the run
/// boundary; the rest abort the run.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("missing webhook credential (set DISCORD_WEBHOOK_URL)")]
    MissingCredential,

    #[error("feed unavailable: {source}")]
    FeedUnavailable {
        #[source]
        source: anyhow::Error,
    },

    /// Delivery broke partway through a feed. `delivered` entries from this
    /// call were posted and recorded before the failure; the rest of the
    /// feed is retried on the next run.
    #[error("delivery failed after {delivered} new item(s): {source}")]
    DeliveryFailed {
        delivered: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("persisted state corrupt at {path}: {source}")]
    PersistedStateCorrupt {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to persist state to {path}: {source}")]
    StatePersist {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl RelayError {
    /// Short kind tag for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingCredential => "missing-credential",
            RelayError::FeedUnavailable { .. } => "feed-unavailable",
            RelayError::DeliveryFailed { .. } => "delivery-failed",
            RelayError::PersistedStateCorrupt { .. } => "state-corrupt",
            RelayError::StatePersist { .. } => "state-persist",
        }
    }
}
