use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::Bot;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::config::BotConfig;
use crate::core::lifecycle::LifecycleManager;
use crate::core::menu::{MenuMachine, SessionStore};
use crate::core::pin::{PinFlag, PinScheduler, PublishOutcome, attach_daily_digest};
use crate::core::sheets::{DataCache, SheetsClient};
use crate::core::terminal::{print_info, print_status, print_success, print_warn};
use crate::interfaces::telegram::{BotServices, TelegramInterface, TelegramTransport};

struct Wiring {
    bot: Bot,
    pin: Arc<PinScheduler>,
    services: Arc<BotServices>,
}

fn wire(config: &BotConfig) -> Result<Wiring> {
    config.validate()?;

    let source = SheetsClient::new(
        config.sheets.spreadsheet_id.clone(),
        config.sheets.api_key.clone(),
    )?;
    let cache = Arc::new(DataCache::new(
        Arc::new(source),
        config.sheet_names(),
        config.cache_ttl(),
    ));

    let flag = Arc::new(PinFlag::load(
        config.pin.flag_file.clone(),
        config.pin.enabled_by_default,
    ));

    let bot = Bot::new(config.telegram_token.clone());
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let pin = Arc::new(PinScheduler::new(
        flag,
        cache.clone(),
        transport.clone(),
        config.pin_settings()?,
    ));
    let menu = Arc::new(MenuMachine::new(cache, SessionStore::new()));

    let services = Arc::new(BotServices {
        menu,
        pin: pin.clone(),
        transport,
    });
    Ok(Wiring { bot, pin, services })
}

pub async fn run_bot(config: BotConfig) -> Result<()> {
    let wiring = wire(&config)?;

    let mut lifecycle = LifecycleManager::new()
        .await
        .context("failed to create scheduler")?;
    let telegram = Arc::new(Mutex::new(TelegramInterface::new(
        wiring.bot,
        wiring.services,
    )));
    lifecycle.attach(telegram);
    attach_daily_digest(&mut lifecycle, wiring.pin.clone()).await?;

    lifecycle.start().await?;

    print_success("relbot is running.");
    print_status("Digest chat", &config.pin.chat_id.to_string());
    print_status("Scheduled jobs", &lifecycle.jobs().join(", "));
    print_status(
        "Daily digest",
        if wiring.pin.is_enabled() { "on" } else { "off" },
    );
    print_info("Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, stopping");
    lifecycle.shutdown().await?;
    Ok(())
}

pub async fn pin_now(config: BotConfig) -> Result<()> {
    let wiring = wire(&config)?;
    match wiring.pin.publish_now().await? {
        PublishOutcome::Published(message_id) => {
            print_success(&format!(
                "Digest pinned in chat {} (message {}).",
                config.pin.chat_id, message_id
            ));
        }
        PublishOutcome::Skipped => {
            print_warn("pin.chat_id (PIN_CHAT_ID) is not set, nothing published.");
        }
    }
    Ok(())
}
