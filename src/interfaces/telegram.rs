use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{ApiError, RequestError};
use tracing::{debug, error, info, warn};

use crate::core::lifecycle::LifecycleComponent;
use crate::core::menu::{MenuCommand, MenuMachine, render_failed};
use crate::core::pin::{PinScheduler, PublishOutcome};
use crate::core::transport::{
    Keyboard, Screen, Transport, TransportError, TransportResult, show_or_fallback,
};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
enum Command {
    #[command(description = "открыть меню релизов")]
    Start,
    #[command(description = "закрепить сводку сейчас")]
    Pinactive,
    #[command(description = "вкл/выкл ежедневную сводку")]
    Pinswitch,
    #[command(description = "завершить диалог")]
    Cancel,
}

fn map_error(e: RequestError) -> TransportError {
    match e {
        RequestError::Api(ApiError::MessageNotModified) => TransportError::NotModified,
        RequestError::Api(api) => TransportError::Rejected(api.to_string()),
        other => TransportError::Network(other.to_string()),
    }
}

fn markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
    }))
}

/// [`Transport`] over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_message(&self, chat_id: i64, html: &str) -> TransportResult<i32> {
        self.bot
            .send_message(ChatId(chat_id), html)
            .parse_mode(ParseMode::Html)
            .await
            .map(|msg| msg.id.0)
            .map_err(map_error)
    }

    async fn send_screen(&self, chat_id: i64, screen: &Screen) -> TransportResult<i32> {
        let request = self
            .bot
            .send_message(ChatId(chat_id), screen.text.clone())
            .parse_mode(ParseMode::Html);
        let request = if screen.keyboard.is_empty() {
            request
        } else {
            request.reply_markup(markup(&screen.keyboard))
        };
        request.await.map(|msg| msg.id.0).map_err(map_error)
    }

    async fn pin_message(&self, chat_id: i64, message_id: i32, silent: bool) -> TransportResult<()> {
        self.bot
            .pin_chat_message(ChatId(chat_id), MessageId(message_id))
            .disable_notification(silent)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn unpin_all(&self, chat_id: i64) -> TransportResult<()> {
        self.bot
            .unpin_all_chat_messages(ChatId(chat_id))
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn edit_message(&self, chat_id: i64, message_id: i32, screen: &Screen) -> TransportResult<()> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), screen.text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(markup(&screen.keyboard))
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}

/// Everything the update handlers need.
pub struct BotServices {
    pub menu: Arc<MenuMachine>,
    pub pin: Arc<PinScheduler>,
    pub transport: Arc<TelegramTransport>,
}

async fn reply(bot: &Bot, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    bot.send_message(chat_id, text).await?;
    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<BotServices>,
) -> ResponseResult<()> {
    let Some(user_id) = msg.from.as_ref().map(|u| u.id.0 as i64) else {
        return Ok(());
    };
    info!("Command {:?} from user {} in chat {}", cmd, user_id, msg.chat.id);

    match cmd {
        Command::Start => {
            let screen = services.menu.start(user_id).await;
            if let Err(e) = services.transport.send_screen(msg.chat.id.0, &screen).await {
                error!("Failed to send menu to chat {}: {}", msg.chat.id, e);
            }
            Ok(())
        }
        Command::Pinactive => {
            let text = match services.pin.publish_now().await {
                Ok(PublishOutcome::Published(_)) => "Сводка закреплена.",
                Ok(PublishOutcome::Skipped) => "Чат для сводки не настроен.",
                Err(e) => {
                    error!("Manual digest failed: {}", e);
                    "Не удалось закрепить сводку."
                }
            };
            reply(&bot, msg.chat.id, text).await
        }
        Command::Pinswitch => {
            let text = match services.pin.toggle() {
                Ok(true) => "Авто-сводка включена.",
                Ok(false) => "Авто-сводка выключена.",
                Err(e) => {
                    error!("Failed to persist pin flag: {}", e);
                    "Не удалось сохранить настройку."
                }
            };
            reply(&bot, msg.chat.id, text).await
        }
        Command::Cancel => {
            services.menu.cancel(user_id).await;
            reply(&bot, msg.chat.id, "Диалог завершён.").await
        }
    }
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    services: Arc<BotServices>,
) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback: {}", e);
    }

    let Some(command) = q.data.as_deref().and_then(MenuCommand::parse) else {
        debug!("Ignoring unknown callback data {:?}", q.data);
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        debug!("Callback without message, nothing to edit");
        return Ok(());
    };

    let screen = services.menu.dispatch(q.from.id.0 as i64, command).await;
    if let Err(e) = show_or_fallback(
        services.transport.as_ref(),
        message.chat().id.0,
        message.id().0,
        &screen,
        &render_failed(),
    )
    .await
    {
        error!("Failed to update menu message: {}", e);
    }
    Ok(())
}

pub struct TelegramInterface {
    bot: Bot,
    services: Arc<BotServices>,
    shutdown: Option<ShutdownToken>,
}

impl TelegramInterface {
    pub fn new(bot: Bot, services: Arc<BotServices>) -> Self {
        Self {
            bot,
            services,
            shutdown: None,
        }
    }

    async fn start_bot(&mut self) -> Result<()> {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            error!("Failed to set telegram bot commands: {}", e);
        }

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(handle_command),
            )
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![self.services.clone()])
            .build();
        self.shutdown = Some(dispatcher.shutdown_token());

        tokio::spawn(async move {
            dispatcher.dispatch().await;
        });
        Ok(())
    }
}

#[async_trait]
impl LifecycleComponent for TelegramInterface {
    async fn on_init(&mut self) -> Result<()> {
        info!("Telegram Interface initializing...");
        Ok(())
    }

    async fn on_start(&mut self) -> Result<()> {
        info!("Telegram Interface starting...");
        if let Err(e) = self.start_bot().await {
            error!("Telegram Bot crashed: {}", e);
        }
        Ok(())
    }

    async fn on_shutdown(&mut self) -> Result<()> {
        info!("Telegram Interface shutting down...");
        if let Some(token) = self.shutdown.take() {
            match token.shutdown() {
                Ok(done) => done.await,
                Err(e) => debug!("Dispatcher already stopped: {}", e),
            }
        }
        Ok(())
    }
}
