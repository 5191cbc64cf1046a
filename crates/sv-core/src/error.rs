use serde::Serialize;
use thiserror::Error;

use crate::path::DocPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Schema,
    TextCompleteness,
    ExpressionSyntax,
    DialogueStructure,
    Reference,
    Source,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Schema => "SchemaError",
            Self::TextCompleteness => "TextCompletenessError",
            Self::ExpressionSyntax => "ExpressionSyntaxError",
            Self::DialogueStructure => "DialogueStructureError",
            Self::Reference => "ReferenceError",
            Self::Source => "SourceError",
        }
    }
}

/// A single validation failure.
///
/// `path` is a JSON pointer into the document (`/npcs/mayor/spawn`). Failures
/// raised while walking a dialogue tree also carry the dotted location of that
/// dialogue (`quests.basicQuest.stages.0.dialogue`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", render(.dialogue, .path, .message))]
pub struct StorylineError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    pub path: Option<String>,
    pub dialogue: Option<String>,
}

impl StorylineError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            path: None,
            dialogue: None,
        }
    }

    pub fn at(
        kind: ErrorKind,
        code: impl Into<String>,
        path: &DocPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            path: Some(path.pointer()),
            dialogue: None,
        }
    }

    pub fn with_path(mut self, path: &DocPath) -> Self {
        self.path = Some(path.pointer());
        self
    }

    pub fn in_dialogue(mut self, location: &DocPath) -> Self {
        if self.dialogue.is_none() {
            self.dialogue = Some(location.dotted());
        }
        self
    }
}

fn render(dialogue: &Option<String>, path: &Option<String>, message: &str) -> String {
    let located = match path.as_deref() {
        Some(pointer) if !pointer.is_empty() => format!("{}: {}", pointer, message),
        _ => message.to_string(),
    };
    match dialogue {
        Some(location) => format!("Error validating dialogue at {}: {}", location, located),
        None => located,
    }
}
