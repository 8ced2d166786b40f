// src/runner.rs
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::notify::Notifier;
use crate::processor::process_feed;
use crate::source::FeedSource;
use crate::state::State;

/// Aggregate outcome of one run, for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub new_items: usize,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
}

/// One full pass over the configured feeds.
///
/// The credential is validated before anything else; without it no feed is
/// touched. State is loaded once up front and saved exactly once after all
/// feeds were attempted, so a crash mid-run can re-deliver this run's items
/// next time but can never corrupt history across feeds. Per-feed failures
/// are logged and contained: one feed's malfunction never blocks delivery
/// to, or persistence for, the others.
pub async fn run(
    cfg: &RelayConfig,
    source: &dyn FeedSource,
    notifier: &dyn Notifier,
) -> Result<RunSummary, RelayError> {
    if cfg
        .webhook_url
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        return Err(RelayError::MissingCredential);
    }

    let mut state = State::load(&cfg.state_path, cfg.seen_cap)?;
    let mut summary = RunSummary::default();

    for feed in &cfg.feeds {
        let seen = state.feed_mut(&feed.url);
        match process_feed(feed, source, notifier, &cfg.keywords, seen, cfg.post_delay()).await {
            Ok(new) => {
                summary.new_items += new;
                summary.feeds_ok += 1;
                if new > 0 {
                    tracing::info!(feed = %feed.name, new, "feed processed");
                }
            }
            Err(err) => {
                // Items delivered before a mid-feed failure still count;
                // they were posted and are recorded as seen.
                if let RelayError::DeliveryFailed { delivered, .. } = &err {
                    summary.new_items += *delivered;
                }
                summary.feeds_failed += 1;
                tracing::warn!(feed = %feed.name, kind = err.kind(), error = %err, "feed failed");
            }
        }
    }

    if let Err(err) = state.save(&cfg.state_path) {
        // the posts already went out; surface the counts before bailing
        tracing::error!(
            new_items = summary.new_items,
            feeds_ok = summary.feeds_ok,
            feeds_failed = summary.feeds_failed,
            error = %err,
            "state save failed after deliveries"
        );
        return Err(err);
    }
    tracing::info!(
        new_items = summary.new_items,
        feeds_ok = summary.feeds_ok,
        feeds_failed = summary.feeds_failed,
        "run complete"
    );
    Ok(summary)
}
