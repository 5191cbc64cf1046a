use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// A flag name parsed once into its role.
///
/// `quest.<id>.active` and `quest.<id>.complete` drive quest state; every other
/// name is a free-form gameplay flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlagKey {
    QuestActive(String),
    QuestComplete(String),
    Gameplay(String),
}

impl FlagKey {
    pub fn parse(raw: &str) -> Self {
        if let Some(captures) = quest_flag_regex().captures(raw) {
            let quest_id = captures[1].to_string();
            return match &captures[2] {
                "active" => Self::QuestActive(quest_id),
                _ => Self::QuestComplete(quest_id),
            };
        }
        Self::Gameplay(raw.to_string())
    }

    pub fn active(quest_id: &str) -> Self {
        Self::QuestActive(quest_id.to_string())
    }

    pub fn complete(quest_id: &str) -> Self {
        Self::QuestComplete(quest_id.to_string())
    }

    pub fn activated_quest(&self) -> Option<&str> {
        match self {
            Self::QuestActive(quest_id) => Some(quest_id),
            _ => None,
        }
    }

    pub fn completed_quest(&self) -> Option<&str> {
        match self {
            Self::QuestComplete(quest_id) => Some(quest_id),
            _ => None,
        }
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuestActive(quest_id) => write!(f, "quest.{}.active", quest_id),
            Self::QuestComplete(quest_id) => write!(f, "quest.{}.complete", quest_id),
            Self::Gameplay(name) => f.write_str(name),
        }
    }
}

impl Serialize for FlagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn quest_flag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^quest\.([A-Za-z0-9_\-]+)\.(active|complete)$").expect("quest flag regex")
    })
}
