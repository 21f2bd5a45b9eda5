use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, NaiveTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::pin::PinSettings;
use crate::core::sheets::SheetNames;

pub const DEFAULT_CONFIG_FILE: &str = "relbot.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub telegram_token: String,

    #[serde(default)]
    pub sheets: SheetsConfig,

    #[serde(default)]
    pub pin: PinConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_releases_sheet")]
    pub releases_sheet: String,

    #[serde(default = "default_tasks_sheet")]
    pub tasks_sheet: String,

    #[serde(default = "default_owners_sheet")]
    pub owners_sheet: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinConfig {
    /// 0 disables publishing.
    #[serde(default)]
    pub chat_id: i64,

    #[serde(default = "default_true")]
    pub enabled_by_default: bool,

    #[serde(default = "default_flag_file")]
    pub flag_file: PathBuf,

    /// Local `HH:MM` at `utc_offset_hours`.
    #[serde(default = "default_pin_time")]
    pub time: String,

    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_releases_sheet() -> String {
    SheetNames::default().releases
}
fn default_tasks_sheet() -> String {
    SheetNames::default().tasks
}
fn default_owners_sheet() -> String {
    SheetNames::default().owners
}
fn default_cache_ttl_secs() -> u64 {
    crate::core::sheets::CACHE_TTL.as_secs()
}
fn default_true() -> bool {
    true
}
fn default_flag_file() -> PathBuf {
    PathBuf::from(".pin_flag.json")
}
fn default_pin_time() -> String {
    "09:00".to_string()
}
fn default_utc_offset_hours() -> i32 {
    3
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            sheets: SheetsConfig::default(),
            pin: PinConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            api_key: String::new(),
            releases_sheet: default_releases_sheet(),
            tasks_sheet: default_tasks_sheet(),
            owners_sheet: default_owners_sheet(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            chat_id: 0,
            enabled_by_default: default_true(),
            flag_file: default_flag_file(),
            time: default_pin_time(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl BotConfig {
    /// Reads the TOML file (defaults when it does not exist), then applies
    /// environment overrides.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config {}", config_path.display()))?
        } else {
            if path.is_some() {
                bail!("config file {} not found", config_path.display());
            }
            info!("No {} found, using defaults and environment.", DEFAULT_CONFIG_FILE);
            BotConfig::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TELEGRAM_TOKEN") {
            self.telegram_token = token;
        }
        if let Some(key) = get("GOOGLE_SHEET_KEY") {
            self.sheets.spreadsheet_id = key;
        }
        if let Some(key) = get("GOOGLE_API_KEY") {
            self.sheets.api_key = key;
        }
        if let Some(name) = get("TASK_SHEET_NAME") {
            self.sheets.tasks_sheet = name;
        }
        if let Some(chat) = get("PIN_CHAT_ID") {
            self.pin.chat_id = chat
                .trim()
                .parse()
                .with_context(|| format!("PIN_CHAT_ID is not a number: {}", chat))?;
        }
        if let Some(enabled) = get("PIN_ENABLED") {
            self.pin.enabled_by_default = enabled.trim() == "on";
        }
        if let Some(file) = get("PIN_FLAG_FILE") {
            self.pin.flag_file = PathBuf::from(file);
        }
        if let Some(level) = get("RELBOT_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Settings needed to talk to Telegram and the spreadsheet.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.telegram_token.trim().is_empty() {
            missing.push("telegram_token (TELEGRAM_TOKEN)");
        }
        if self.sheets.spreadsheet_id.trim().is_empty() {
            missing.push("sheets.spreadsheet_id (GOOGLE_SHEET_KEY)");
        }
        if !missing.is_empty() {
            bail!("missing configuration: {}", missing.join(", "));
        }
        self.pin_settings()?;
        Ok(())
    }

    pub fn sheet_names(&self) -> SheetNames {
        SheetNames {
            releases: self.sheets.releases_sheet.clone(),
            tasks: self.sheets.tasks_sheet.clone(),
            owners: self.sheets.owners_sheet.clone(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.sheets.cache_ttl_secs)
    }

    pub fn pin_settings(&self) -> Result<PinSettings> {
        let time = NaiveTime::parse_from_str(self.pin.time.trim(), "%H:%M")
            .with_context(|| format!("pin.time must be HH:MM, got '{}'", self.pin.time))?;
        let utc_offset = FixedOffset::east_opt(self.pin.utc_offset_hours * 3600)
            .with_context(|| format!("pin.utc_offset_hours out of range: {}", self.pin.utc_offset_hours))?;
        Ok(PinSettings {
            chat_id: self.pin.chat_id,
            time,
            utc_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_sheet_layout() {
        let config = BotConfig::default();
        assert_eq!(config.sheets.releases_sheet, "Релизы");
        assert_eq!(config.sheets.tasks_sheet, "Release");
        assert_eq!(config.sheets.owners_sheet, "Ответственные");
        assert_eq!(config.cache_ttl(), Duration::from_secs(180));
        assert_eq!(config.pin.chat_id, 0);
        assert!(config.pin.enabled_by_default);
    }

    #[test]
    fn default_pin_time_is_nine_at_plus_three() {
        let settings = BotConfig::default().pin_settings().unwrap();
        assert_eq!(settings.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(settings.utc_offset.local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn parse_partial_toml() {
        let content = r#"
telegram_token = "123:abc"

[sheets]
spreadsheet_id = "sheet-key"
tasks_sheet = "Задачи"

[pin]
chat_id = -100200300
time = "10:30"
"#;
        let config: BotConfig = toml::from_str(content).unwrap();
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.sheets.tasks_sheet, "Задачи");
        assert_eq!(config.sheets.owners_sheet, "Ответственные");
        assert_eq!(config.pin.chat_id, -100200300);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = BotConfig::default();
        config
            .apply_env(env(&[
                ("TELEGRAM_TOKEN", "t"),
                ("GOOGLE_SHEET_KEY", "k"),
                ("PIN_CHAT_ID", "-42"),
                ("PIN_ENABLED", "off"),
                ("TASK_SHEET_NAME", "Tasks"),
            ]))
            .unwrap();
        assert_eq!(config.telegram_token, "t");
        assert_eq!(config.sheets.spreadsheet_id, "k");
        assert_eq!(config.pin.chat_id, -42);
        assert!(!config.pin.enabled_by_default);
        assert_eq!(config.sheet_names().tasks, "Tasks");
    }

    #[test]
    fn bad_chat_id_is_an_error() {
        let mut config = BotConfig::default();
        assert!(config.apply_env(env(&[("PIN_CHAT_ID", "group")])).is_err());
    }

    #[test]
    fn validate_names_missing_settings() {
        let err = BotConfig::default().validate().unwrap_err().to_string();
        assert!(err.contains("TELEGRAM_TOKEN"));
        assert!(err.contains("GOOGLE_SHEET_KEY"));
    }

    #[test]
    fn bad_pin_time_fails_validation() {
        let mut config = BotConfig::default();
        config.telegram_token = "t".into();
        config.sheets.spreadsheet_id = "k".into();
        config.pin.time = "9am".into();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(BotConfig::load(Some(&missing)).await.is_err());
    }

    #[tokio::test]
    async fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relbot.toml");
        std::fs::write(&path, "[pin]\nutc_offset_hours = 5\n").unwrap();
        let config = BotConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.pin.utc_offset_hours, 5);
    }
}
