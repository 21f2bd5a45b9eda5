pub mod digest;
pub mod filter;

use teloxide::utils::html;

use crate::core::sheets::Row;

// Column headers of the release sheet.
pub const COL_TITLE: &str = "Поставка";
pub const COL_TITLE_ALT: &str = "Release";
pub const COL_STATUS: &str = "Статус";
pub const COL_CONTENT: &str = "Содержание";
pub const COL_ANALYST: &str = "Аналитик";
pub const COL_BACKEND: &str = "Back";
pub const COL_FRONTEND: &str = "Front";
pub const COL_QA: &str = "QA";
pub const COL_ANALYSIS_DUE: &str = "SA";
pub const COL_IFT_FROM: &str = "ИФТ с";
pub const COL_IFT_TO: &str = "ИФТ по";
pub const COL_PSI_DUE: &str = "ПСИ";
pub const COL_RELEASE_DUE: &str = "релиз";

pub const OWNER_COLUMNS: [&str; 4] = [COL_ANALYST, COL_BACKEND, COL_FRONTEND, COL_QA];

// Task sheet.
pub const TASK_RELEASE: &str = "Release";
pub const TASK_STORY: &str = "Story";
pub const TASK_NAME: &str = "Task";
pub const TASK_STATUS: &str = "Status";

// Roster sheet.
pub const ROSTER_TG_ID: &str = "tg_id";
pub const ROSTER_SURNAME: &str = "Фамилия";

const UNTITLED: &str = "Без названия";
const PLACEHOLDER: &str = "—";

pub fn title_of(row: &Row) -> &str {
    row.get(COL_TITLE)
        .or_else(|| row.get(COL_TITLE_ALT))
        .unwrap_or(UNTITLED)
}

/// HTML-escaped cell value, a dash when the cell is blank.
pub fn esc(value: Option<&str>) -> String {
    html::escape(value.unwrap_or(PLACEHOLDER))
}

/// Room left for a title in Telegram's 64-byte callback data after the
/// `rel:` prefix.
pub const CALLBACK_TITLE_BYTES: usize = 60;

/// `title` cut to [`CALLBACK_TITLE_BYTES`] on a char boundary.
pub fn clip_title(title: &str) -> &str {
    if title.len() <= CALLBACK_TITLE_BYTES {
        return title;
    }
    let mut end = CALLBACK_TITLE_BYTES;
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    &title[..end]
}

/// Exact title match first; a title that may have been clipped also
/// matches the first release it prefixes.
pub fn find_release<'a>(rows: &'a [Row], title: &str) -> Option<&'a Row> {
    rows.iter().find(|r| title_of(r) == title).or_else(|| {
        // A clipped title ends at most 3 bytes short of the limit.
        if title.is_empty() || title.len() + 3 < CALLBACK_TITLE_BYTES {
            return None;
        }
        rows.iter().find(|r| title_of(r).starts_with(title))
    })
}

/// Surname of the roster entry whose `tg_id` equals `user_id`.
pub fn surname_for(roster: &[Row], user_id: i64) -> Option<String> {
    let wanted = user_id.to_string();
    roster
        .iter()
        .find(|r| r.get(ROSTER_TG_ID).map(str::trim) == Some(wanted.as_str()))
        .and_then(|r| r.get(ROSTER_SURNAME))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
