use teloxide::utils::html;

use crate::core::releases::filter::StatusBucket;
use crate::core::releases::{
    COL_ANALYSIS_DUE, COL_CONTENT, COL_IFT_FROM, COL_IFT_TO, COL_PSI_DUE, COL_RELEASE_DUE,
    COL_STATUS, OWNER_COLUMNS, TASK_NAME, TASK_RELEASE, TASK_STATUS, TASK_STORY, esc, title_of,
};
use crate::core::sheets::Row;
use crate::core::transport::{Button, Keyboard, Screen};

use super::command::{ActionKind, MenuCommand, View};

pub const NOTHING_FOUND: &str = "Ничего не найдено.";
pub const RELEASE_NOT_FOUND: &str = "Не удалось найти релиз.";
pub const NOT_IN_ROSTER: &str =
    "⚠️ В листе «Ответственные» нет вашего tg_id.\nПопросите администратора добавить запись.";
pub const NO_TASKS: &str = "Задач нет.";
pub const RENDER_FAILED: &str = "Не удалось показать список.";

/// Task lines shown for one release.
pub const MAX_TASKS: usize = 40;

fn button(label: &str, command: MenuCommand) -> Button {
    Button::new(label, command.encode())
}

fn back(command: MenuCommand) -> Vec<Button> {
    vec![button("⬅️ Назад", command)]
}

pub fn root() -> Screen {
    let keyboard = vec![
        vec![button("📋 Список релизов", MenuCommand::Category(View::All))],
        vec![
            button("✅ Активные", MenuCommand::Category(View::Bucket(StatusBucket::Active))),
            button("🗓 Запланированные", MenuCommand::Category(View::Bucket(StatusBucket::Planned))),
        ],
        vec![button("📁 Прошедшие", MenuCommand::Category(View::Bucket(StatusBucket::Past)))],
        vec![button("👤 Мои релизы", MenuCommand::My)],
    ];
    Screen::new("Выберите категорию:", keyboard)
}

pub fn my_menu() -> Screen {
    let keyboard = vec![
        vec![
            button("✅ Активные", MenuCommand::MyCategory(StatusBucket::Active)),
            button("🗓 Запланированные", MenuCommand::MyCategory(StatusBucket::Planned)),
        ],
        vec![button("📁 Прошедшие", MenuCommand::MyCategory(StatusBucket::Past))],
        back(MenuCommand::BackToMenu),
    ];
    Screen::new("Мои релизы – категория:", keyboard)
}

/// One button per release; "back" leads to the "my" sub-menu when the list
/// is filtered by owner.
pub fn release_list(rows: &[Row], owner_filtered: bool) -> Screen {
    let back_to = if owner_filtered {
        MenuCommand::BackToMyMenu
    } else {
        MenuCommand::BackToMenu
    };
    if rows.is_empty() {
        return Screen::new(NOTHING_FOUND, vec![back(back_to)]);
    }
    let mut keyboard: Keyboard = rows
        .iter()
        .map(|r| {
            let title = title_of(r);
            vec![button(title, MenuCommand::Release(title.to_string()))]
        })
        .collect();
    keyboard.push(back(back_to));
    Screen::new("Выберите релиз:", keyboard)
}

pub fn action_menu(title: &str) -> Screen {
    let keyboard = vec![
        vec![button("📊 Статус", MenuCommand::Action(ActionKind::Status))],
        vec![button("👥 Ответственные", MenuCommand::Action(ActionKind::Owners))],
        vec![button("📅 Этапы / сроки", MenuCommand::Action(ActionKind::Stages))],
        vec![button("🗒 Задачи", MenuCommand::Action(ActionKind::Tasks))],
        vec![button("⬅️ К релизам", MenuCommand::BackToReleases)],
    ];
    Screen::new(format!("Вы выбрали <b>{}</b>.", html::escape(title)), keyboard)
}

pub fn release_not_found() -> Screen {
    Screen::new(RELEASE_NOT_FOUND, vec![back(MenuCommand::BackToMenu)])
}

/// Sent as a new message when a screen could not replace the old one.
pub fn render_failed() -> Screen {
    Screen::new(RENDER_FAILED, vec![back(MenuCommand::BackToMenu)])
}

pub fn not_in_roster() -> Screen {
    Screen::new(NOT_IN_ROSTER, vec![back(MenuCommand::BackToMenu)])
}

pub fn detail(kind: ActionKind, release: &Row, tasks: &[Row]) -> Screen {
    let text = match kind {
        ActionKind::Status => status_text(release),
        ActionKind::Owners => owners_text(release),
        ActionKind::Stages => stages_text(release),
        ActionKind::Tasks => tasks_text(title_of(release), tasks),
    };
    Screen::new(text, vec![back(MenuCommand::BackToActions)])
}

fn status_text(release: &Row) -> String {
    format!(
        "<b>{}</b>\n{}\n\n<b>Статус:</b> {}\n<b>Дедлайн:</b> {}",
        html::escape(title_of(release)),
        esc(release.get(COL_CONTENT)),
        esc(release.get(COL_STATUS)),
        esc(release.get(COL_RELEASE_DUE))
    )
}

fn owners_text(release: &Row) -> String {
    OWNER_COLUMNS
        .iter()
        .map(|col| format!("<b>{}:</b> {}", col, esc(release.get(col))))
        .collect::<Vec<_>>()
        .join("\n")
}

fn stages_text(release: &Row) -> String {
    let ift_from = esc(release.get(COL_IFT_FROM));
    format!(
        "<b>Аналитика до:</b>  {}\n<b>Разработка до:</b> {}\n<b>ИФТ:</b>            {} → {}\n<b>ПСИ до:</b>        {}\n<b>Релиз до:</b>      {}",
        esc(release.get(COL_ANALYSIS_DUE)),
        ift_from,
        ift_from,
        esc(release.get(COL_IFT_TO)),
        esc(release.get(COL_PSI_DUE)),
        esc(release.get(COL_RELEASE_DUE))
    )
}

fn tasks_text(title: &str, tasks: &[Row]) -> String {
    let wanted = title.trim().to_lowercase();
    let lines: Vec<String> = tasks
        .iter()
        .filter(|t| t.norm(TASK_RELEASE) == wanted)
        .take(MAX_TASKS)
        .map(|t| {
            format!(
                "• <b>{}</b> | {} | <i>{}</i>",
                esc(t.get(TASK_STORY)),
                esc(t.get(TASK_NAME)),
                esc(t.get(TASK_STATUS))
            )
        })
        .collect();
    if lines.is_empty() {
        NO_TASKS.to_string()
    } else {
        lines.join("\n")
    }
}
