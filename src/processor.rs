// src/processor.rs
use std::time::Duration;

use crate::config::FeedConfig;
use crate::error::RelayError;
use crate::filter::title_matches;
use crate::identity::identify;
use crate::notify::{Announcement, Notifier};
use crate::source::FeedSource;
use crate::state::SeenSet;

/// Process one feed end to end: fetch, deliver whatever is new, record it.
///
/// Feed documents list newest first; entries are walked in reverse so the
/// destination channel reads chronologically. Delivery order is a contract
/// here, not an accident of iteration.
///
/// Entries are skipped (silently, uncounted) when title or link is empty
/// after trimming, when the keyword filter rejects the title, or when the
/// identifier is already in the seen-set. Each successful delivery is
/// recorded immediately, so a later failure in the same feed never causes
/// a re-post: on `DeliveryFailed` the already-delivered count rides along
/// in the error and the unsent remainder is picked up next run.
pub async fn process_feed(
    feed: &FeedConfig,
    source: &dyn FeedSource,
    notifier: &dyn Notifier,
    keywords: &[String],
    seen: &mut SeenSet,
    post_delay: Duration,
) -> Result<usize, RelayError> {
    let entries = source
        .fetch(&feed.url)
        .await
        .map_err(|source| RelayError::FeedUnavailable { source })?;

    let mut delivered = 0usize;
    for entry in entries.iter().rev() {
        let title = entry.title.as_deref().unwrap_or_default().trim();
        let link = entry.link.as_deref().unwrap_or_default().trim();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        if !title_matches(title, keywords) {
            continue;
        }
        let id = identify(entry);
        if seen.contains(&id) {
            continue;
        }

        // Courtesy pause between deliveries to the same channel; none
        // before the first or after the last.
        if delivered > 0 && !post_delay.is_zero() {
            tokio::time::sleep(post_delay).await;
        }

        let announcement = Announcement {
            title: title.to_string(),
            link: link.to_string(),
            source: feed.name.clone(),
        };
        if let Err(e) = notifier.deliver(&announcement).await {
            return Err(RelayError::DeliveryFailed {
                delivered,
                source: e,
            });
        }
        seen.record(&id);
        delivered += 1;
        tracing::debug!(feed = %feed.name, title = %announcement.title, "announced entry");
    }

    Ok(delivered)
}
