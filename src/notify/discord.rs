// src/notify/discord.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use super::{Announcement, Notifier};

/// Posts announcements to a Discord webhook. The webhook URL doubles as
/// the delivery credential; when it is absent every send fails, which the
/// run coordinator turns into a startup error before any feed is touched.
/// One attempt per announcement, no retries.
#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: Option<String>,
    client: Client,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook: Option<String>) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    fn render(announcement: &Announcement) -> String {
        format!(
            "**{}**\n{}\n_(via {})_",
            announcement.title, announcement.link, announcement.source
        )
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver(&self, announcement: &Announcement) -> Result<()> {
        let Some(url) = &self.webhook else {
            return Err(anyhow!("no webhook configured"));
        };

        let body = serde_json::json!({ "content": Self::render(announcement) });

        self.client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("discord webhook post")?
            .error_for_status()
            .context("discord webhook non-2xx")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_bold_link_via_format() {
        let a = Announcement {
            title: "X".into(),
            link: "http://e/1".into(),
            source: "Wire".into(),
        };
        assert_eq!(DiscordNotifier::render(&a), "**X**\nhttp://e/1\n_(via Wire)_");
    }

    #[tokio::test]
    async fn missing_webhook_fails_delivery() {
        let n = DiscordNotifier::new(None);
        let a = Announcement {
            title: "X".into(),
            link: "http://e/1".into(),
            source: "Wire".into(),
        };
        assert!(n.deliver(&a).await.is_err());
    }
}
