// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod notify;
pub mod processor;
pub mod runner;
pub mod source;
pub mod state;

// ---- Re-exports for stable public API ----
pub use crate::config::{FeedConfig, RelayConfig};
pub use crate::error::RelayError;
pub use crate::notify::{Announcement, DiscordNotifier, Notifier};
pub use crate::runner::{run, RunSummary};
pub use crate::source::{Entry, FeedSource, HttpFeedSource};
pub use crate::state::{SeenSet, State, DEFAULT_SEEN_CAP};
