use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::info;
use tracing_subscriber::EnvFilter;

use galeriebot::bot;
use galeriebot::config::BotConfig;
use galeriebot::dialogue::GalleryDialogueState;
use galeriebot::store::GalleryStore;
use galeriebot::transport::FtpConnector;

/// Telegram bot that manages an artist's FTP-hosted image gallery.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Receive updates over a webhook instead of long polling
    #[arg(long)]
    webhook: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = BotConfig::from_env()?;

    std::fs::create_dir_all(&config.download_dir).with_context(|| {
        format!(
            "could not create download directory {}",
            config.download_dir.display()
        )
    })?;

    info!("Starting gallery Telegram bot");

    let bot = Bot::new(config.bot_token.clone());

    let connector = Arc::new(FtpConnector::new(Duration::from_secs(
        config.reconnect.operation_timeout_secs,
    )));
    let store = Arc::new(GalleryStore::new(
        config.store.clone(),
        config.reconnect.clone(),
        connector,
    ));
    let config = Arc::new(config);

    let mut dispatcher = Dispatcher::builder(bot.clone(), bot::schema())
        .dependencies(dptree::deps![
            InMemStorage::<GalleryDialogueState>::new(),
            Arc::clone(&store),
            Arc::clone(&config)
        ])
        .enable_ctrlc_handler()
        .build();

    if args.webhook {
        let web_url = config
            .web_url
            .as_deref()
            .context("WEBURL must be set for webhook mode")?;
        let addr = ([0, 0, 0, 0], config.port).into();
        // The token in the path keeps strangers from posting updates.
        let url = format!("{}/{}", web_url, config.bot_token)
            .parse()
            .context("WEBURL does not form a valid webhook URL")?;
        let listener = webhooks::axum(bot, webhooks::Options::new(addr, url))
            .await
            .context("could not register webhook")?;
        info!(port = config.port, "listening for webhook updates");
        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        info!("polling for updates");
        dispatcher.dispatch().await;
    }

    Ok(())
}
