use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flag::FlagKey;
use crate::path::DocPath;
use crate::text::TextValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    Or,
    And,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Add,
    Sub,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "or" => Self::Or,
            "and" => Self::And,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "+" => Self::Add,
            "-" => Self::Sub,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Add => "+",
            Self::Sub => "-",
        }
    }

    /// Binding strength, loosest first.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Eq | Self::Ne => 3,
            Self::Add | Self::Sub => 4,
        }
    }
}

/// Parsed counter or condition expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expr {
    Flag {
        name: FlagKey,
    },
    Integer {
        value: i64,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Flags read by this expression, left to right.
    pub fn flags(&self) -> Vec<&FlagKey> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Self::Flag { name } => out.push(name),
                Self::Integer { .. } => {}
                Self::Binary { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag { name } => write!(f, "{}", name),
            Self::Integer { value } => write!(f, "{}", value),
            Self::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlagEffect {
    pub flag: FlagKey,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub value: String,
    pub path: DocPath,
    pub text: TextValue,
    pub then_text: Option<TextValue>,
    pub cond: Option<Expr>,
    pub effects: Vec<FlagEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNode {
    pub text: TextValue,
    pub cond: Option<Expr>,
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialogue {
    pub location: DocPath,
    pub nodes: Vec<DialogueNode>,
}

impl Dialogue {
    pub fn responses(&self) -> impl Iterator<Item = &Response> {
        self.nodes.iter().flat_map(|node| node.responses.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub id: String,
    pub name: TextValue,
    pub spawn: Spawn,
    pub direction: Option<String>,
    pub dialogue: Option<Dialogue>,
    pub act_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Single(String),
    All(Vec<String>),
}

impl Requirement {
    pub fn quest_ids(&self) -> Vec<&str> {
        match self {
            Self::Single(id) => vec![id.as_str()],
            Self::All(ids) => ids.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub dialogue: Option<Dialogue>,
    pub requirement: Option<Requirement>,
    pub cond: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub expression: Expr,
    pub set: Option<FlagKey>,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub prompt: Option<TextValue>,
    pub cond: Option<Expr>,
    pub counter: Option<Counter>,
    pub dialogue: Option<Dialogue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    pub id: String,
    pub npc: String,
    pub prompt: Option<TextValue>,
    pub progressive_prompt: Option<TextValue>,
    pub available: Option<Availability>,
    pub stages: Vec<Stage>,
    pub dialogues: Vec<Dialogue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneryItem {
    pub id: String,
    pub kind: Option<String>,
    pub layer: Option<String>,
    pub spawn: Spawn,
    pub direction: Option<String>,
    pub z_index: Option<f64>,
    pub cond: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ending {
    pub dialogue: Option<Dialogue>,
}

/// A storyline that passed every validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Storyline {
    pub languages: Vec<String>,
    pub enabled: bool,
    pub prompt: Option<TextValue>,
    pub decision: Option<TextValue>,
    pub dialogues: Vec<Dialogue>,
    pub npcs: Vec<Npc>,
    pub quests: Vec<Quest>,
    pub scenery: Vec<SceneryItem>,
    pub ending: Option<Ending>,
}

impl Storyline {
    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    /// Every dialogue in the document: root, npcs, quests, then ending.
    pub fn all_dialogues(&self) -> Vec<&Dialogue> {
        let mut out = self.dialogues.iter().collect::<Vec<_>>();
        out.extend(self.npcs.iter().filter_map(|npc| npc.dialogue.as_ref()));
        for quest in &self.quests {
            out.extend(quest.dialogues.iter());
            if let Some(dialogue) = quest
                .available
                .as_ref()
                .and_then(|available| available.dialogue.as_ref())
            {
                out.push(dialogue);
            }
            out.extend(quest.stages.iter().filter_map(|stage| stage.dialogue.as_ref()));
        }
        if let Some(dialogue) = self.ending.as_ref().and_then(|ending| ending.dialogue.as_ref()) {
            out.push(dialogue);
        }
        out
    }

    pub fn all_responses(&self) -> Vec<&Response> {
        self.all_dialogues()
            .into_iter()
            .flat_map(Dialogue::responses)
            .collect()
    }

    pub fn all_counters(&self) -> Vec<&Counter> {
        self.quests
            .iter()
            .flat_map(|quest| quest.stages.iter())
            .filter_map(|stage| stage.counter.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod types_tests {
    use super::*;

    fn flag(name: &str) -> Box<Expr> {
        Box::new(Expr::Flag {
            name: FlagKey::parse(name),
        })
    }

    #[test]
    fn binary_op_symbols_round_trip() {
        for symbol in ["or", "and", "<", "<=", ">", ">=", "==", "!=", "+", "-"] {
            let op = BinaryOp::from_symbol(symbol).expect("known operator");
            assert_eq!(op.symbol(), symbol);
        }
        assert_eq!(BinaryOp::from_symbol("="), None);
        assert!(BinaryOp::Or.precedence() < BinaryOp::And.precedence());
        assert!(BinaryOp::Lt.precedence() < BinaryOp::Add.precedence());
    }

    #[test]
    fn expr_collects_flags_and_renders_grouping() {
        let expr = Expr::Binary {
            op: BinaryOp::And,
            left: flag("quest.a.active"),
            right: Box::new(Expr::Binary {
                op: BinaryOp::Ge,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    left: flag("trashA"),
                    right: flag("trashB"),
                }),
                right: Box::new(Expr::Integer { value: 2 }),
            }),
        };
        let names = expr
            .flags()
            .into_iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["quest.a.active", "trashA", "trashB"]);
        assert_eq!(
            expr.to_string(),
            "(quest.a.active and ((trashA + trashB) >= 2))"
        );
    }

    #[test]
    fn expr_serializes_with_kind_tag() {
        let json = serde_json::to_value(Expr::Integer { value: 3 }).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "integer", "value": 3}));
    }

    #[test]
    fn requirement_lists_ids_in_order() {
        assert_eq!(Requirement::Single("a".to_string()).quest_ids(), vec!["a"]);
        assert_eq!(
            Requirement::All(vec!["a".to_string(), "b".to_string()]).quest_ids(),
            vec!["a", "b"]
        );
    }
}
