//! Transitions of the common (unfiltered) menu and release action cards.

use super::{USER, buttons, harness};
use crate::core::menu::screens::{NOTHING_FOUND, RELEASE_NOT_FOUND};
use crate::core::menu::{ActionKind, MenuCommand, MenuState, Mode, View};
use crate::core::releases::filter::StatusBucket;
use crate::core::sheets::Row;

#[tokio::test]
async fn start_shows_root_in_browsing_state() {
    let h = harness();
    let screen = h.machine.start(USER).await;
    assert_eq!(screen.text, "Выберите категорию:");
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.state, MenuState::BrowsingCategories);
}

#[tokio::test]
async fn category_lists_matching_releases() {
    let h = harness();
    let screen = h
        .machine
        .dispatch(USER, MenuCommand::Category(View::Bucket(StatusBucket::Active)))
        .await;
    assert_eq!(buttons(&screen), vec!["rel:R1", "back_to_menu"]);

    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.mode, Mode::Common);
    assert_eq!(session.view, Some(View::Bucket(StatusBucket::Active)));
    assert_eq!(session.state, MenuState::BrowsingCategories);
}

#[tokio::test]
async fn list_shows_every_release() {
    let h = harness();
    let screen = h.machine.dispatch(USER, MenuCommand::Category(View::All)).await;
    assert_eq!(buttons(&screen), vec!["rel:R1", "rel:R2", "rel:R3", "back_to_menu"]);
}

#[tokio::test]
async fn empty_category_says_nothing_found() {
    let h = harness();
    h.source.put("Релизы", vec![Row::from([("Поставка", "R9"), ("Статус", "3. Разработка")])]);
    let screen = h
        .machine
        .dispatch(USER, MenuCommand::Category(View::Bucket(StatusBucket::Past)))
        .await;
    assert_eq!(screen.text, NOTHING_FOUND);
}

#[tokio::test]
async fn selecting_release_moves_to_actions() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::Category(View::All)).await;
    let screen = h.machine.dispatch(USER, MenuCommand::Release("R1".into())).await;
    assert_eq!(screen.text, "Вы выбрали <b>R1</b>.");
    assert!(buttons(&screen).contains(&"act:status".to_string()));

    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.state, MenuState::ViewingReleaseActions);
    assert_eq!(session.release.as_deref(), Some("R1"));
}

#[tokio::test]
async fn action_renders_card_and_stays_in_actions() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::Release("R1".into())).await;

    let status = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Status)).await;
    assert!(status.text.contains("<b>Статус:</b> 3. Разработка"));

    let stages = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Stages)).await;
    assert!(stages.text.contains("01.06.2025 → —"));

    let tasks = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Tasks)).await;
    assert_eq!(tasks.text, "• <b>ST-1</b> | API | <i>In progress</i>");

    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.state, MenuState::ViewingReleaseActions);
}

#[tokio::test]
async fn vanished_release_reports_not_found_and_resets() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::Category(View::All)).await;
    h.machine.dispatch(USER, MenuCommand::Release("R1".into())).await;

    h.source.put("Релизы", vec![Row::from([("Поставка", "R2"), ("Статус", "В планах")])]);
    h.refresh().await;

    let screen = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Status)).await;
    assert_eq!(screen.text, RELEASE_NOT_FOUND);
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.state, MenuState::BrowsingCategories);
    assert_eq!(session.release, None);
}

#[tokio::test]
async fn action_without_selection_is_not_found() {
    let h = harness();
    let screen = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Owners)).await;
    assert_eq!(screen.text, RELEASE_NOT_FOUND);
}

#[tokio::test]
async fn back_to_releases_rerenders_last_list() {
    let h = harness();
    h.machine
        .dispatch(USER, MenuCommand::Category(View::Bucket(StatusBucket::Planned)))
        .await;
    h.machine.dispatch(USER, MenuCommand::Release("R2".into())).await;

    let screen = h.machine.dispatch(USER, MenuCommand::BackToReleases).await;
    assert_eq!(buttons(&screen), vec!["rel:R2", "back_to_menu"]);
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.state, MenuState::BrowsingCategories);
}

#[tokio::test]
async fn back_to_actions_returns_to_action_menu() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::Release("R3".into())).await;
    h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Owners)).await;
    let screen = h.machine.dispatch(USER, MenuCommand::BackToActions).await;
    assert_eq!(screen.text, "Вы выбрали <b>R3</b>.");
}

#[tokio::test]
async fn back_to_menu_discards_filters() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::My).await;
    h.machine.dispatch(USER, MenuCommand::MyCategory(StatusBucket::Active)).await;
    h.machine.dispatch(USER, MenuCommand::Release("R1".into())).await;

    let screen = h.machine.dispatch(USER, MenuCommand::BackToMenu).await;
    assert_eq!(screen.text, "Выберите категорию:");
    let session = h.machine.session(USER).await.unwrap();
    assert_eq!(session.surname, None);
    assert_eq!(session.view, None);
    assert_eq!(session.release, None);
    assert_eq!(session.mode, Mode::Common);
}

#[tokio::test]
async fn cancel_ends_session_from_any_state() {
    let h = harness();
    h.machine.dispatch(USER, MenuCommand::Release("R1".into())).await;
    h.machine.cancel(USER).await;
    assert!(h.machine.session(USER).await.is_none());
}

#[tokio::test]
async fn long_title_survives_callback_round_trip() {
    let h = harness();
    let long = "Миграция платёжного контура на новую схему расчётов";
    h.source.put(
        "Релизы",
        vec![Row::from([("Поставка", long), ("Статус", "3. Разработка")])],
    );

    let list = h.machine.dispatch(USER, MenuCommand::Category(View::All)).await;
    let data = &buttons(&list)[0];
    assert!(data.len() <= 64);

    let command = MenuCommand::parse(data).unwrap();
    let screen = h.machine.dispatch(USER, command).await;
    assert_eq!(screen.text, format!("Вы выбрали <b>{}</b>.", long));

    let status = h.machine.dispatch(USER, MenuCommand::Action(ActionKind::Status)).await;
    assert!(status.text.starts_with(&format!("<b>{}</b>", long)));
}
