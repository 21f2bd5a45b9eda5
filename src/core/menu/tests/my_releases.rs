//! The identity-scoped "my releases" branch of the menu.

use super::{USER, buttons, harness};
use crate::core::menu::screens::NOT_IN_ROSTER;
use crate::core::menu::{MenuCommand, MenuState, Mode};
use crate::core::releases::filter::StatusBucket;

const STRANGER: i64 = 77;

#[tokio::test]
async fn unknown_user_gets_instructions_and_unchanged_session() {
    let h = harness();
    h.machine.start(STRANGER).await;
    let before = h.machine.session(STRANGER).await.unwrap();

    let screen = h.machine.dispatch(STRANGER, MenuCommand::My).await;
    assert_eq!(screen.text, NOT_IN_ROSTER);

    let after = h.machine.session(STRANGER).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.state, MenuState::BrowsingCategories);
}

#[tokio::test]
async fn known_user_gets_sub_menu() {
    let h = harness();
    let screen = h.machine.dispatch(USER, MenuCommand::My).await;
    assert_eq!(
        buttons(&screen),
        vec!["my_active", "my_plan", "my_past", "back_to_menu"]
    );
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.mode, Mode::My);
    assert_eq!(session.surname.as_deref(), Some("Иванов"));
}

#[tokio::test]
async fn my_category_filters_by_owner() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::My).await;

    let active = h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Active)).await;
    assert_eq!(buttons(&active), vec!["rel:R1", "back_to_my_menu"]);

    let past = h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Past)).await;
    assert_eq!(buttons(&past), vec!["rel:R3", "back_to_my_menu"]);

    let planned = h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Planned)).await;
    assert_eq!(buttons(&planned), vec!["back_to_my_menu"]);
}

#[tokio::test]
async fn my_category_without_session_resolves_roster_again() {
    let h = harness();
    let screen = h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Active)).await;
    assert_eq!(buttons(&screen), vec!["rel:R1", "back_to_my_menu"]);

    let screen = h.machine.dispatch(STRANGER, MenuCommand::MyCategory(StatusBucket::Active)).await;
    assert_eq!(screen.text, NOT_IN_ROSTER);
}

#[tokio::test]
async fn back_from_owned_release_keeps_owner_filter() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::My).await;
    h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Past)).await;
    h.machine.dispatch(USER, MenuCommand::Release("R3".into())).await;

    let screen = h.machine.dispatch(USER, MenuCommand::BackToReleases).await;
    assert_eq!(buttons(&screen), vec!["rel:R3", "back_to_my_menu"]);

    let screen = h.machine.dispatch(USER, MenuCommand::BackToMyMenu).await;
    assert_eq!(screen.text, "Мои релизы – категория:");
}

#[tokio::test]
async fn common_category_clears_owner_filter() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::My).await;
    h.machine
        .dispatch(USER, MenuCommand::Category(crate::core::menu::View::All))
        .await;
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.surname, None);
    assert_eq!(session.mode, Mode::Common);
}
