//! Two-state conversation controller behind the inline menu.
//!
//! `BrowsingCategories` covers the category root, the "my releases"
//! sub-menu and release lists; `ViewingReleaseActions` covers the action
//! menu and detail cards of one selected release.

mod command;
mod screens;
mod session;

use std::sync::Arc;
use tracing::{debug, info};

use crate::core::releases::{filter, find_release, surname_for, title_of};
use crate::core::sheets::DataCache;
use crate::core::transport::Screen;

pub use command::{ActionKind, MenuCommand, View};
pub use screens::render_failed;
pub use session::{MenuState, Mode, Session, SessionStore};

pub struct MenuMachine {
    cache: Arc<DataCache>,
    sessions: SessionStore,
}

impl MenuMachine {
    pub fn new(cache: Arc<DataCache>, sessions: SessionStore) -> Self {
        Self { cache, sessions }
    }

    /// Opens the root menu, starting the user's session over.
    pub async fn start(&self, user_id: i64) -> Screen {
        let handle = self.sessions.open(user_id).await;
        *handle.lock().await = Session::default();
        screens::root()
    }

    /// Ends the conversation from any state.
    pub async fn cancel(&self, user_id: i64) {
        if self.sessions.end(user_id).await {
            info!("Session of user {} ended", user_id);
        }
    }

    #[cfg(test)]
    pub async fn session(&self, user_id: i64) -> Option<Session> {
        self.sessions.snapshot(user_id).await
    }

    /// Applies one button press and returns the screen to show.
    pub async fn dispatch(&self, user_id: i64, command: MenuCommand) -> Screen {
        let handle = self.sessions.open(user_id).await;
        let mut session = handle.lock().await;
        debug!("User {} in {:?} pressed {:?}", user_id, session.state, command);
        self.transition(&mut session, user_id, command).await
    }

    async fn transition(&self, session: &mut Session, user_id: i64, command: MenuCommand) -> Screen {
        use MenuCommand::*;
        use MenuState::*;

        match (session.state, command) {
            (_, Category(view)) => {
                session.mode = Mode::Common;
                session.view = Some(view);
                session.surname = None;
                self.browse(session).await
            }
            (_, My) => match self.lookup_surname(user_id).await {
                Some(surname) => {
                    session.mode = Mode::My;
                    session.surname = Some(surname);
                    session.state = BrowsingCategories;
                    screens::my_menu()
                }
                None => screens::not_in_roster(),
            },
            (_, MyCategory(bucket)) => {
                let surname = match session.surname.clone() {
                    Some(surname) => surname,
                    None => match self.lookup_surname(user_id).await {
                        Some(surname) => surname,
                        None => return screens::not_in_roster(),
                    },
                };
                session.mode = Mode::My;
                session.surname = Some(surname);
                session.view = Some(View::Bucket(bucket));
                self.browse(session).await
            }
            (_, Release(title)) => {
                // Callback data may carry a clipped title.
                let releases = self.cache.releases().await;
                let title = find_release(&releases, &title)
                    .map(|r| title_of(r).to_string())
                    .unwrap_or(title);
                let screen = screens::action_menu(&title);
                session.release = Some(title);
                session.state = ViewingReleaseActions;
                screen
            }
            (ViewingReleaseActions, Action(kind)) => self.show_detail(session, kind).await,
            (BrowsingCategories, Action(_)) => self.release_missing(session),
            (ViewingReleaseActions, BackToActions) => match session.release.clone() {
                Some(title) => screens::action_menu(&title),
                None => self.release_missing(session),
            },
            (BrowsingCategories, BackToActions) => self.release_missing(session),
            (_, BackToReleases) => {
                if session.view.is_some() {
                    self.browse(session).await
                } else {
                    session.state = BrowsingCategories;
                    screens::root()
                }
            }
            (_, BackToMyMenu) => {
                session.state = BrowsingCategories;
                screens::my_menu()
            }
            (_, BackToMenu) => {
                *session = Session::default();
                screens::root()
            }
        }
    }

    /// Renders the list for the session's view and owner filter.
    async fn browse(&self, session: &mut Session) -> Screen {
        session.state = MenuState::BrowsingCategories;
        let rows = self.cache.releases().await;
        let bucket = session.view.and_then(View::bucket);
        let surname = session.surname.as_deref();
        let matching = filter::filter_rows(&rows, bucket, surname);
        screens::release_list(&matching, surname.is_some())
    }

    async fn show_detail(&self, session: &mut Session, kind: ActionKind) -> Screen {
        let Some(title) = session.release.clone() else {
            return self.release_missing(session);
        };
        let releases = self.cache.releases().await;
        let Some(release) = find_release(&releases, &title) else {
            info!("Selected release '{}' is gone from the sheet", title);
            return self.release_missing(session);
        };
        let tasks = match kind {
            ActionKind::Tasks => self.cache.tasks().await,
            _ => Arc::new(Vec::new()),
        };
        screens::detail(kind, release, &tasks)
    }

    fn release_missing(&self, session: &mut Session) -> Screen {
        session.release = None;
        session.state = MenuState::BrowsingCategories;
        screens::release_not_found()
    }

    async fn lookup_surname(&self, user_id: i64) -> Option<String> {
        let roster = self.cache.owners().await;
        surname_for(&roster, user_id)
    }
}

#[cfg(test)]
mod tests;
