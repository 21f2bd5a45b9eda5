mod my_releases;
mod state_machine;

use std::sync::Arc;

use crate::core::menu::{MenuMachine, SessionStore};
use crate::core::sheets::{CACHE_TTL, DataCache, Row, SheetNames};
use crate::core::test_support::FakeSource;

pub(super) const USER: i64 = 1001;

pub(super) fn releases() -> Vec<Row> {
    vec![
        Row::from([
            ("Поставка", "R1"),
            ("Статус", "3. Разработка"),
            ("Back", "Иванов"),
            ("ИФТ с", "01.06.2025"),
        ]),
        Row::from([("Поставка", "R2"), ("Статус", "1. В планах"), ("QA", "Петрова")]),
        Row::from([("Поставка", "R3"), ("Статус", "6. Внедрён"), ("Front", "Иванов")]),
    ]
}

pub(super) fn roster() -> Vec<Row> {
    vec![Row::from([("tg_id", "1001"), ("Фамилия", "Иванов")])]
}

pub(super) struct Harness {
    pub source: Arc<FakeSource>,
    pub cache: Arc<DataCache>,
    pub machine: MenuMachine,
}

impl Harness {
    /// Makes the next read see whatever the source holds now.
    pub async fn refresh(&self) {
        self.cache.invalidate_all().await;
    }
}

pub(super) fn harness() -> Harness {
    let source = Arc::new(FakeSource::new());
    source.put("Релизы", releases());
    source.put("Ответственные", roster());
    source.put(
        "Release",
        vec![Row::from([("Release", "R1"), ("Story", "ST-1"), ("Task", "API"), ("Status", "In progress")])],
    );
    let cache = Arc::new(DataCache::new(source.clone(), SheetNames::default(), CACHE_TTL));
    let machine = MenuMachine::new(cache.clone(), SessionStore::new());
    Harness {
        source,
        cache,
        machine,
    }
}

pub(super) fn buttons(screen: &crate::core::transport::Screen) -> Vec<String> {
    screen.keyboard.iter().flatten().map(|b| b.data.clone()).collect()
}
