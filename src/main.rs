use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;

use muteme_bot::bot::BotContext;
use muteme_bot::config::BotConfig;
use muteme_bot::language_store::{LanguageStore, MemoryLanguageStore, PostgresLanguageStore};
use muteme_bot::localization::Translations;
use muteme_bot::server::{self, WebhookState};
use muteme_bot::telegram::TeloxideChatApi;

#[derive(Parser)]
#[command(name = "muteme-bot")]
#[command(about = "A Telegram bot that lets group members mute themselves")]
struct Args {
    /// overrides the PORT environment variable
    #[arg(long)]
    port: Option<u16>,

    /// don't call setWebhook on startup
    #[arg(long)]
    skip_webhook_registration: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file not found, which is fine
            }
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut config = BotConfig::from_env()?;
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }

    let translations = match &config.locales_dir {
        Some(dir) => Translations::load_dir(dir)?,
        None => Translations::embedded()?,
    };

    let store: Arc<dyn LanguageStore> = match &config.database_url {
        Some(database_url) => Arc::new(PostgresLanguageStore::connect(database_url).await?),
        None => {
            warn!("DATABASE_URL is not set, chat languages will be kept in memory only");
            Arc::new(MemoryLanguageStore::new())
        }
    };

    let bot = Bot::new(&config.bot_token);
    let me = bot.get_me().await?;
    info!("Starting bot @{}...", me.username());

    if args.skip_webhook_registration {
        info!("Skipping webhook registration");
    } else {
        let mut request = bot
            .set_webhook(config.webhook_url.clone())
            .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery]);
        if let Some(secret) = &config.webhook_secret {
            request = request.secret_token(secret.clone());
        }
        request.await?;
        info!("Registered webhook {}", config.webhook_url);
    }

    let ctx = BotContext::new(
        Arc::new(TeloxideChatApi::new(bot)),
        store,
        Arc::new(translations),
    );
    let state = WebhookState {
        ctx,
        bot_username: Arc::from(me.username()),
        secret: config.webhook_secret.as_deref().map(Arc::from),
    };

    server::serve(config.bind_addr, &config.webhook_path(), state).await?;

    Ok(())
}
