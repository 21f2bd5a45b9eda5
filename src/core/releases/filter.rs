use crate::core::sheets::Row;

use super::{COL_STATUS, OWNER_COLUMNS};

/// Lifecycle grouping used by the category menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Planned,
    Active,
    Past,
}

impl StatusBucket {
    #[cfg(test)]
    pub const ALL: [StatusBucket; 3] = [StatusBucket::Planned, StatusBucket::Active, StatusBucket::Past];

    /// Substrings of the lower-cased status that place a row in the bucket.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            StatusBucket::Planned => &["в планах", "ожидание"],
            StatusBucket::Active => &["анализ", "разработка", "ифт", "пси"],
            StatusBucket::Past => &["внедрен", "внедрён", "deployed"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusBucket::Planned => "plan",
            StatusBucket::Active => "active",
            StatusBucket::Past => "past",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "plan" => Some(StatusBucket::Planned),
            "active" => Some(StatusBucket::Active),
            "past" => Some(StatusBucket::Past),
            _ => None,
        }
    }
}

pub fn bucket(row: &Row, bucket: StatusBucket) -> bool {
    let status = row.norm(COL_STATUS);
    bucket.keywords().iter().any(|k| status.contains(k))
}

pub fn owns_row(row: &Row, surname: &str) -> bool {
    let owners = OWNER_COLUMNS
        .iter()
        .map(|c| row.norm(c))
        .collect::<Vec<_>>()
        .join(" ");
    owners.contains(&surname.trim().to_lowercase())
}

/// Bucket filter, then ownership filter. Either may be omitted; a blank
/// surname counts as omitted.
pub fn filter_rows(rows: &[Row], wanted: Option<StatusBucket>, surname: Option<&str>) -> Vec<Row> {
    let surname = surname.filter(|s| !s.trim().is_empty());
    rows.iter()
        .filter(|r| wanted.is_none_or(|b| bucket(r, b)))
        .filter(|r| surname.is_none_or(|s| owns_row(r, s)))
        .cloned()
        .collect()
}
