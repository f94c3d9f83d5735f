use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use resize_bot::bot::{self, Conversation, TelegramGateway};
use resize_bot::config::BotConfig;
use resize_bot::health;
use resize_bot::resizer::ImageResizer;
use resize_bot::session::ResizeState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resize_bot=info")),
        )
        .init();

    info!("Starting Resize Telegram Bot");

    let config = BotConfig::from_env().context("Failed to read configuration")?;
    info!(
        health_port = config.health_port,
        max_side = config.resize.max_side,
        max_pixels = config.resize.max_pixels,
        "Configuration loaded"
    );

    // Hosting platforms probe this port, the bot itself never reads from it
    let health_port = config.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(health_port).await {
            error!(error = %e, "Health check listener stopped");
        }
    });

    let bot = Bot::new(config.token.clone());
    let conversation = Arc::new(Conversation::new(
        TelegramGateway::new(bot.clone()),
        ImageResizer::new(config.resize.clone()),
    ));

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<ResizeState>, ResizeState>()
            .endpoint(bot::message_handler),
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<ResizeState>::new(), conversation])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
