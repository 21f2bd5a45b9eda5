//! In-memory doubles for the sheet source and the messaging transport.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::sheets::{DataSource, Row};
use crate::core::transport::{Screen, Transport, TransportError, TransportResult};

#[derive(Default)]
pub struct FakeSource {
    sheets: Mutex<HashMap<String, Option<Vec<Row>>>>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, sheet: &str, rows: Vec<Row>) {
        self.sheets.lock().unwrap().insert(sheet.to_string(), Some(rows));
    }

    pub fn fail(&self, sheet: &str) {
        self.sheets.lock().unwrap().insert(sheet.to_string(), None);
    }

    pub fn fetch_count(&self, sheet: &str) -> usize {
        self.fetches.lock().unwrap().get(sheet).copied().unwrap_or(0)
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn fetch_collection(&self, sheet: &str) -> Result<Vec<Row>> {
        *self.fetches.lock().unwrap().entry(sheet.to_string()).or_default() += 1;
        match self.sheets.lock().unwrap().get(sheet) {
            Some(Some(rows)) => Ok(rows.clone()),
            Some(None) => Err(anyhow!("sheet '{}' is unreachable", sheet)),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message { chat_id: i64, message_id: i32, text: String },
    Pin { chat_id: i64, message_id: i32, silent: bool },
    Screen { chat_id: i64, message_id: i32, screen: Screen },
    UnpinAll { chat_id: i64 },
    Edit { chat_id: i64, message_id: i32, screen: Screen },
}

#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<Sent>>,
    next_id: Mutex<i32>,
    unpin_error: Mutex<Option<TransportError>>,
    send_error: Mutex<Option<TransportError>>,
    pin_error: Mutex<Option<TransportError>>,
    edit_error: Mutex<Option<TransportError>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_unpin_with(&self, error: TransportError) {
        *self.unpin_error.lock().unwrap() = Some(error);
    }

    pub fn fail_send_with(&self, error: TransportError) {
        *self.send_error.lock().unwrap() = Some(error);
    }

    pub fn fail_pin_with(&self, error: TransportError) {
        *self.pin_error.lock().unwrap() = Some(error);
    }

    pub fn fail_edit_with(&self, error: TransportError) {
        *self.edit_error.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_message(&self, chat_id: i64, html: &str) -> TransportResult<i32> {
        if let Some(e) = self.send_error.lock().unwrap().clone() {
            return Err(e);
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            message_id: *next_id,
            text: html.to_string(),
        });
        Ok(*next_id)
    }

    async fn send_screen(&self, chat_id: i64, screen: &Screen) -> TransportResult<i32> {
        if let Some(e) = self.send_error.lock().unwrap().clone() {
            return Err(e);
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.sent.lock().unwrap().push(Sent::Screen {
            chat_id,
            message_id: *next_id,
            screen: screen.clone(),
        });
        Ok(*next_id)
    }

    async fn pin_message(&self, chat_id: i64, message_id: i32, silent: bool) -> TransportResult<()> {
        if let Some(e) = self.pin_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.sent.lock().unwrap().push(Sent::Pin {
            chat_id,
            message_id,
            silent,
        });
        Ok(())
    }

    async fn unpin_all(&self, chat_id: i64) -> TransportResult<()> {
        if let Some(e) = self.unpin_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.sent.lock().unwrap().push(Sent::UnpinAll { chat_id });
        Ok(())
    }

    async fn edit_message(&self, chat_id: i64, message_id: i32, screen: &Screen) -> TransportResult<()> {
        if let Some(e) = self.edit_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.sent.lock().unwrap().push(Sent::Edit {
            chat_id,
            message_id,
            screen: screen.clone(),
        });
        Ok(())
    }
}
