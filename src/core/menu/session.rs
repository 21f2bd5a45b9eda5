use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::command::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    BrowsingCategories,
    ViewingReleaseActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Common,
    My,
}

/// Per-user conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub state: MenuState,
    pub mode: Mode,
    pub view: Option<View>,
    pub surname: Option<String>,
    pub release: Option<String>,
}

/// Sessions keyed by Telegram user id. Each session has its own lock, so
/// one user's transitions run one at a time without blocking other users.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's session, created on first use.
    pub async fn open(&self, user_id: i64) -> Arc<Mutex<Session>> {
        self.sessions
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// Drops the session; returns whether one existed.
    pub async fn end(&self, user_id: i64) -> bool {
        self.sessions.lock().await.remove(&user_id).is_some()
    }

    #[cfg(test)]
    pub async fn snapshot(&self, user_id: i64) -> Option<Session> {
        let handle = self.sessions.lock().await.get(&user_id).cloned()?;
        let session = handle.lock().await.clone();
        Some(session)
    }
}
