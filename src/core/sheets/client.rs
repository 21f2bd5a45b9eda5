use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{DataSource, Row};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// ── Sheets API v4 responses ──

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

// ── Client ──

/// Reads whole worksheets of one spreadsheet through the Sheets REST API.
pub struct SheetsClient {
    spreadsheet_id: String,
    api_key: String,
    base_url: String,
    client: Client,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: String, api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            spreadsheet_id,
            api_key,
            base_url: SHEETS_API.to_string(),
            client,
        })
    }

    /// Worksheet titles are matched after trimming and ignoring case, since
    /// people edit them by hand.
    async fn resolve_title(&self, wanted: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, self.spreadsheet_id);
        let res = self
            .client
            .get(&url)
            .query(&[("fields", "sheets.properties.title"), ("key", self.api_key.as_str())])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "Sheets API error {}: {}",
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let meta: SpreadsheetMeta = res.json().await?;
        let wanted = wanted.trim().to_lowercase();
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .find(|title| title.trim().to_lowercase() == wanted))
    }

    async fn fetch_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        // Quoting keeps titles with spaces from being read as A1 ranges.
        let range = format!("'{}'", title.replace('\'', "''"));
        let url = format!(
            "{}/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&range)
        );
        let res = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "Sheets API error {}: {}",
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: ValueRange = res.json().await?;
        Ok(parsed
            .values
            .into_iter()
            .map(|line| line.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First line is the header, every following non-blank line one record.
pub(crate) fn records_from_values(values: &[Vec<String>]) -> Vec<Row> {
    let Some((header, lines)) = values.split_first() else {
        return Vec::new();
    };
    lines
        .iter()
        .map(|line| Row::from_header(header, line))
        .filter(|row| !row.is_empty())
        .collect()
}

#[async_trait]
impl DataSource for SheetsClient {
    async fn fetch_collection(&self, sheet: &str) -> Result<Vec<Row>> {
        let Some(title) = self.resolve_title(sheet).await? else {
            debug!("Sheet '{}' not present in spreadsheet", sheet);
            return Ok(Vec::new());
        };
        let values = self.fetch_values(&title).await?;
        Ok(records_from_values(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn records_use_first_line_as_header() {
        let values = vec![
            line(&["Поставка", "Статус"]),
            line(&["R1", "Разработка"]),
            line(&["", ""]),
            line(&["R2"]),
        ];
        let rows = records_from_values(&values);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Статус"), Some("Разработка"));
        assert_eq!(rows[1].get("Поставка"), Some("R2"));
        assert_eq!(rows[1].get("Статус"), None);
    }

    #[test]
    fn empty_sheet_has_no_records() {
        assert!(records_from_values(&[]).is_empty());
        assert!(records_from_values(&[line(&["Поставка"])]).is_empty());
    }

    #[test]
    fn numeric_cells_are_stringified() {
        assert_eq!(cell_text(serde_json::json!(123456789)), "123456789");
        assert_eq!(cell_text(serde_json::json!("x")), "x");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }
}
