mod flag;

use anyhow::Result;
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::lifecycle::LifecycleManager;
use crate::core::releases::digest;
use crate::core::sheets::DataCache;
use crate::core::transport::{Transport, TransportError, TransportResult};

pub use flag::PinFlag;

/// Where and when the digest goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSettings {
    /// Target chat; 0 means not configured.
    pub chat_id: i64,
    pub time: NaiveTime,
    pub utc_offset: FixedOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(i32),
    /// No target chat configured.
    Skipped,
}

pub struct PinScheduler {
    flag: Arc<PinFlag>,
    cache: Arc<DataCache>,
    transport: Arc<dyn Transport>,
    settings: PinSettings,
}

impl PinScheduler {
    pub fn new(
        flag: Arc<PinFlag>,
        cache: Arc<DataCache>,
        transport: Arc<dyn Transport>,
        settings: PinSettings,
    ) -> Self {
        Self {
            flag,
            cache,
            transport,
            settings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.flag.is_enabled()
    }

    pub fn toggle(&self) -> Result<bool> {
        self.flag.toggle()
    }

    /// Current calendar date at the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.settings.utc_offset).date_naive()
    }

    pub async fn run_scheduled(&self) -> TransportResult<Option<PublishOutcome>> {
        self.run_scheduled_on(self.today()).await
    }

    /// Publishes only when the flag is on and `date` is a working day.
    pub async fn run_scheduled_on(&self, date: NaiveDate) -> TransportResult<Option<PublishOutcome>> {
        if !self.flag.is_enabled() {
            debug!("Daily digest disabled, skipping run for {}", date);
            return Ok(None);
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            debug!("{} is a weekend, skipping daily digest", date);
            return Ok(None);
        }
        self.publish_on(date).await.map(Some)
    }

    /// Manual trigger: ignores the flag and the weekday.
    pub async fn publish_now(&self) -> TransportResult<PublishOutcome> {
        self.publish_on(self.today()).await
    }

    async fn publish_on(&self, today: NaiveDate) -> TransportResult<PublishOutcome> {
        let chat_id = self.settings.chat_id;
        if chat_id == 0 {
            warn!("Pin chat id is not configured, digest not sent");
            return Ok(PublishOutcome::Skipped);
        }

        let rows = self.cache.releases().await;
        let text = digest::build(&rows, today);

        match self.transport.unpin_all(chat_id).await {
            Ok(()) => {}
            Err(TransportError::Rejected(reason)) => {
                debug!("Nothing unpinned in chat {}: {}", chat_id, reason);
            }
            Err(e) => return Err(e),
        }

        let message_id = self.transport.send_message(chat_id, &text).await?;
        self.transport.pin_message(chat_id, message_id, true).await?;
        info!("Digest pinned in chat {} (message {})", chat_id, message_id);
        Ok(PublishOutcome::Published(message_id))
    }

    /// Six-field cron expression firing daily at the configured time, read
    /// in the configured offset. Weekends are filtered in
    /// [`run_scheduled_on`](Self::run_scheduled_on).
    pub fn cron_expression(&self) -> String {
        format!(
            "0 {} {} * * *",
            self.settings.time.minute(),
            self.settings.time.hour()
        )
    }
}

/// Registers the daily digest job on the lifecycle scheduler.
pub async fn attach_daily_digest(
    lifecycle: &mut LifecycleManager,
    pin: Arc<PinScheduler>,
) -> Result<()> {
    let cron = pin.cron_expression();
    info!(
        "Scheduling daily digest at {} {} (cron '{}')",
        pin.settings.time.format("%H:%M"),
        pin.settings.utc_offset,
        cron
    );

    lifecycle
        .schedule("daily digest", &cron, pin.settings.utc_offset, move || {
            let pin = pin.clone();
            async move {
                if let Err(e) = pin.run_scheduled().await {
                    error!("Daily digest failed: {}", e);
                }
            }
        })
        .await
}
