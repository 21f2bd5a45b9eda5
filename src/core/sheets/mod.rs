mod cache;
mod client;
mod row;

use anyhow::Result;
use async_trait::async_trait;

pub use cache::{CACHE_TTL, DataCache};
pub use client::SheetsClient;
pub use row::Row;

/// The row collections the bot reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Releases,
    Tasks,
    Owners,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Releases, Collection::Tasks, Collection::Owners];
}

/// Sheet titles for each collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub releases: String,
    pub tasks: String,
    pub owners: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            releases: "Релизы".to_string(),
            tasks: "Release".to_string(),
            owners: "Ответственные".to_string(),
        }
    }
}

impl SheetNames {
    pub fn name_of(&self, collection: Collection) -> &str {
        match collection {
            Collection::Releases => &self.releases,
            Collection::Tasks => &self.tasks,
            Collection::Owners => &self.owners,
        }
    }
}

/// Anything that can return every row of a named sheet.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_collection(&self, sheet: &str) -> Result<Vec<Row>>;
}
