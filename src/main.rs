//! news-relay — Binary Entrypoint
//! One invocation = one run: poll every configured feed, announce unseen
//! entries to the webhook, persist de-duplication state. Scheduling cadence
//! belongs to cron (or any outer supervisor), not to this process.

use news_relay::config::RelayConfig;
use news_relay::notify::DiscordNotifier;
use news_relay::runner::{self, RunSummary};
use news_relay::source::HttpFeedSource;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("news_relay=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

async fn run() -> anyhow::Result<RunSummary> {
    let cfg = RelayConfig::load_default()?;
    let source = HttpFeedSource::new(cfg.http_timeout())?;
    let notifier =
        DiscordNotifier::new(cfg.webhook_url.clone()).with_timeout(cfg.http_timeout_secs);
    Ok(runner::run(&cfg, &source, &notifier).await?)
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when the vars come from the real env.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(summary) => {
            println!(
                "Done. Posted {} new items at {}.",
                summary.new_items,
                chrono::Utc::now().to_rfc3339()
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
