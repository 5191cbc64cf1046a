use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use sv_core::{
    Availability, Counter, Dialogue, DialogueNode, DocPath, Ending, ErrorKind, Expr, FlagEffect,
    FlagKey, Npc, Quest, Requirement, Response, SceneryItem, Spawn, Stage, Storyline, StorylineError,
    TextValue,
};
use sv_parser::{
    parse_expression_with_limits, ExprLimits, DEFAULT_MAX_EXPRESSION_DEPTH,
    DEFAULT_MAX_EXPRESSION_TERMS,
};
use tracing::{debug, trace};

mod dialogue;
mod expressions;
mod json_utils;
mod model_build;
mod pipeline;
mod references;
mod schema;
mod texts;

#[cfg(test)]
mod tests;

use dialogue::{validate_dialogue, DialogueContext};
use expressions::{optional_expression, parse_expression_at};
use json_utils::{
    as_array, as_bool, as_integer, as_number, as_object, as_str, optional_number, optional_str,
    require, type_error, JsonObject,
};
use model_build::ModelBuilder;
use references::validate_references;
use schema::validate_schema;
use texts::{checked_text, optional_checked_text, parse_text};

pub use dialogue::{collect_dialogue_locations, DialogueLocation, DialogueMode};
pub use pipeline::{resolve_languages, validate_storyline};
pub use references::settable_flags;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub languages: Vec<String>,
    pub max_expression_depth: usize,
    pub max_expression_terms: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
            max_expression_terms: DEFAULT_MAX_EXPRESSION_TERMS,
        }
    }
}

impl ValidatorConfig {
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn expr_limits(&self) -> ExprLimits {
        ExprLimits {
            max_depth: self.max_expression_depth,
            max_terms: self.max_expression_terms,
        }
    }
}
