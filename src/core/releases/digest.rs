//! Daily summary of releases in development and integration testing.
//!
//! Grouping is a plain status substring test, independent of
//! [`StatusBucket`](super::filter::StatusBucket).

use chrono::NaiveDate;
use teloxide::utils::html;

use crate::core::sheets::Row;

use super::{COL_IFT_FROM, COL_IFT_TO, COL_STATUS, esc, title_of};

pub const EMPTY_DIGEST: &str = "Сейчас нет релизов в статусах Разработка и ИФТ";

const DEV_MARKER: &str = "разработка";
const IFT_MARKER: &str = "ифт";

const FULL_YEAR_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];
const SHORT_YEAR_FORMATS: [&str; 3] = ["%d.%m.%y", "%d/%m/%y", "%d-%m-%y"];

/// Parses the day-first dates found in the sheet: `31.12.2025`, `31.12.25`,
/// `31/12/2025`, `31-12-2025` and ISO `2025-12-31`, optionally followed by
/// a time which is ignored. Two-digit years follow chrono's `%y` pivot
/// (`70`..`99` are 1900s).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let token = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .find(|t| !t.is_empty())?;
    let mut parts = token.split(['.', '/', '-']);
    let first = parts.next().unwrap_or_default();
    let last = parts.last().unwrap_or_default();
    let formats: &[&str] = if first.len() != 4 && last.len() == 2 {
        &SHORT_YEAR_FORMATS
    } else {
        &FULL_YEAR_FORMATS
    };
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

/// Deadline phrase relative to `today`; empty for absent or unparsable dates.
pub fn days_phrase(date: Option<&str>, today: NaiveDate) -> String {
    let Some(deadline) = date.and_then(parse_date) else {
        return String::new();
    };
    let diff = (deadline - today).num_days();
    if diff > 0 {
        format!("осталось {} дн.", diff)
    } else if diff < 0 {
        format!("<b>❗ просрочено на {} дн.</b>", diff.abs())
    } else {
        "сегодня последний день".to_string()
    }
}

fn with_phrase(line: String, phrase: String) -> String {
    if phrase.is_empty() {
        line
    } else {
        format!("{} {}", line, phrase)
    }
}

fn dev_line(row: &Row, today: NaiveDate) -> String {
    let line = format!(
        "• <b>{}</b> — до {}",
        html::escape(title_of(row)),
        esc(row.get(COL_IFT_FROM))
    );
    with_phrase(line, days_phrase(row.get(COL_IFT_FROM), today))
}

fn ift_line(row: &Row, today: NaiveDate) -> String {
    let line = format!(
        "• <b>{}</b> — {} → {}",
        html::escape(title_of(row)),
        esc(row.get(COL_IFT_FROM)),
        esc(row.get(COL_IFT_TO))
    );
    with_phrase(line, days_phrase(row.get(COL_IFT_TO), today))
}

/// Renders the HTML digest. A row in both statuses is listed once, under
/// development.
pub fn build(rows: &[Row], today: NaiveDate) -> String {
    let (dev, rest): (Vec<&Row>, Vec<&Row>) = rows
        .iter()
        .partition(|r| r.norm(COL_STATUS).contains(DEV_MARKER));
    let ift: Vec<&Row> = rest
        .into_iter()
        .filter(|r| r.norm(COL_STATUS).contains(IFT_MARKER))
        .collect();

    let mut parts = Vec::new();
    if !dev.is_empty() {
        let lines: Vec<String> = dev.iter().map(|r| dev_line(r, today)).collect();
        parts.push(format!("<b>Разработка:</b>\n{}", lines.join("\n")));
    }
    if !ift.is_empty() {
        let lines: Vec<String> = ift.iter().map(|r| ift_line(r, today)).collect();
        parts.push(format!("<b>ИФТ:</b>\n{}", lines.join("\n")));
    }

    if parts.is_empty() {
        EMPTY_DIGEST.to_string()
    } else {
        parts.join("\n\n")
    }
}
