//! Messaging port used by the digest workflow and the menu.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The edit would leave the message exactly as it is.
    #[error("message is not modified")]
    NotModified,

    /// The platform understood the request and refused it.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("network failure: {0}")]
    Network(String),
}

/// One inline button; `data` travels back in the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

pub type Keyboard = Vec<Vec<Button>>;

/// HTML text plus the keyboard shown under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Screen {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends HTML text, returning the new message id.
    async fn send_message(&self, chat_id: i64, html: &str) -> TransportResult<i32>;

    /// Sends a screen, keyboard included, as a new message.
    async fn send_screen(&self, chat_id: i64, screen: &Screen) -> TransportResult<i32>;

    async fn pin_message(&self, chat_id: i64, message_id: i32, silent: bool) -> TransportResult<()>;

    async fn unpin_all(&self, chat_id: i64) -> TransportResult<()>;

    async fn edit_message(&self, chat_id: i64, message_id: i32, screen: &Screen) -> TransportResult<()>;
}

/// Edit that treats re-rendering identical content as success.
pub async fn edit_or_keep(
    transport: &dyn Transport,
    chat_id: i64,
    message_id: i32,
    screen: &Screen,
) -> TransportResult<()> {
    match transport.edit_message(chat_id, message_id, screen).await {
        Err(TransportError::NotModified) => Ok(()),
        other => other,
    }
}

/// Replaces a menu message in place. When the platform refuses the edit,
/// `fallback` goes out as a new message so the user still gets an answer.
pub async fn show_or_fallback(
    transport: &dyn Transport,
    chat_id: i64,
    message_id: i32,
    screen: &Screen,
    fallback: &Screen,
) -> TransportResult<()> {
    match edit_or_keep(transport, chat_id, message_id, screen).await {
        Err(TransportError::Rejected(reason)) => {
            warn!(
                "Edit of message {} in chat {} rejected ({}), sending fallback",
                message_id, chat_id, reason
            );
            transport.send_screen(chat_id, fallback).await.map(|_| ())
        }
        other => other,
    }
}
