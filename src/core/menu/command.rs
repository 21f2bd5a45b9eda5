use crate::core::releases::clip_title;
use crate::core::releases::filter::StatusBucket;

/// Which release list is being browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Bucket(StatusBucket),
}

impl View {
    pub fn bucket(self) -> Option<StatusBucket> {
        match self {
            View::All => None,
            View::Bucket(b) => Some(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Status,
    Owners,
    Stages,
    Tasks,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Status => "status",
            ActionKind::Owners => "owners",
            ActionKind::Stages => "stages",
            ActionKind::Tasks => "tasks",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "status" => Some(ActionKind::Status),
            "owners" => Some(ActionKind::Owners),
            "stages" => Some(ActionKind::Stages),
            "tasks" => Some(ActionKind::Tasks),
            _ => None,
        }
    }
}

/// A button press, decoded from callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Category(View),
    My,
    MyCategory(StatusBucket),
    Release(String),
    Action(ActionKind),
    BackToReleases,
    BackToMyMenu,
    BackToActions,
    BackToMenu,
}

impl MenuCommand {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(title) = data.strip_prefix("rel:") {
            return Some(MenuCommand::Release(title.to_string()));
        }
        if let Some(kind) = data.strip_prefix("act:") {
            return ActionKind::from_token(kind).map(MenuCommand::Action);
        }
        if let Some(bucket) = data.strip_prefix("my_") {
            return StatusBucket::from_token(bucket).map(MenuCommand::MyCategory);
        }
        match data {
            "list" => Some(MenuCommand::Category(View::All)),
            "my" => Some(MenuCommand::My),
            "back_to_releases" => Some(MenuCommand::BackToReleases),
            "back_to_my_menu" => Some(MenuCommand::BackToMyMenu),
            "back_to_actions" => Some(MenuCommand::BackToActions),
            "back_to_menu" => Some(MenuCommand::BackToMenu),
            other => StatusBucket::from_token(other).map(|b| MenuCommand::Category(View::Bucket(b))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            MenuCommand::Category(View::All) => "list".to_string(),
            MenuCommand::Category(View::Bucket(b)) => b.as_str().to_string(),
            MenuCommand::My => "my".to_string(),
            MenuCommand::MyCategory(b) => format!("my_{}", b.as_str()),
            MenuCommand::Release(title) => format!("rel:{}", clip_title(title)),
            MenuCommand::Action(kind) => format!("act:{}", kind.as_str()),
            MenuCommand::BackToReleases => "back_to_releases".to_string(),
            MenuCommand::BackToMyMenu => "back_to_my_menu".to_string(),
            MenuCommand::BackToActions => "back_to_actions".to_string(),
            MenuCommand::BackToMenu => "back_to_menu".to_string(),
        }
    }
}
