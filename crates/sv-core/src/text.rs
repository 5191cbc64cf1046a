use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Localized text as authored: one string for every language, or one string
/// per language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Literal(String),
    PerLanguage(BTreeMap<String, String>),
}

impl TextValue {
    /// First configured language this text has no entry for.
    pub fn missing_language<'a>(&self, languages: &'a [String]) -> Option<&'a str> {
        match self {
            Self::Literal(_) => None,
            Self::PerLanguage(texts) => languages
                .iter()
                .find(|code| !texts.contains_key(code.as_str()))
                .map(String::as_str),
        }
    }
}
