// src/notify/mod.rs
pub mod discord;

pub use discord::DiscordNotifier;

use anyhow::Result;

/// What gets announced for one new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub link: String,
    /// Display name of the feed the entry came from.
    pub source: String,
}

/// Outbound-delivery collaborator. One call, one announcement; a non-2xx
/// response or transport failure surfaces as `Err`.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, announcement: &Announcement) -> Result<()>;
}
