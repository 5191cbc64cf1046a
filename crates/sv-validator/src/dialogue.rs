use crate::*;

const KIND: ErrorKind = ErrorKind::DialogueStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueMode {
    Standard,
    Ending,
}

#[derive(Debug, Clone)]
pub struct DialogueLocation<'a> {
    pub path: DocPath,
    pub mode: DialogueMode,
    pub items: &'a JsonValue,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DialogueContext<'a> {
    pub(crate) languages: &'a [String],
    pub(crate) limits: ExprLimits,
}

// Order: root dialogues, npcs, quests (keyed, availability, stages), ending.
pub fn collect_dialogue_locations(document: &JsonValue) -> Vec<DialogueLocation<'_>> {
    let mut locations = Vec::new();
    let root = DocPath::root();
    let Some(object) = document.as_object() else {
        return locations;
    };

    if let Some(dialogues) = object.get("dialogues").and_then(JsonValue::as_object) {
        push_keyed(&mut locations, dialogues, &root.key("dialogues"));
    }

    if let Some(npcs) = object.get("npcs").and_then(JsonValue::as_object) {
        for (id, npc) in npcs {
            if let Some(items) = npc.get("dialogue") {
                push(&mut locations, items, root.key("npcs").key(id.as_str()).key("dialogue"));
            }
        }
    }

    if let Some(quests) = object.get("quests").and_then(JsonValue::as_object) {
        for (id, quest) in quests {
            let quest_path = root.key("quests").key(id.as_str());
            if let Some(dialogues) = quest.get("dialogues").and_then(JsonValue::as_object) {
                push_keyed(&mut locations, dialogues, &quest_path.key("dialogues"));
            }
            if let Some(items) = quest.get("available").and_then(|available| available.get("dialogue")) {
                push(&mut locations, items, quest_path.key("available").key("dialogue"));
            }
            if let Some(stages) = quest.get("stages").and_then(JsonValue::as_array) {
                for (index, stage) in stages.iter().enumerate() {
                    if let Some(items) = stage.get("dialogue") {
                        push(
                            &mut locations,
                            items,
                            quest_path.key("stages").index(index).key("dialogue"),
                        );
                    }
                }
            }
        }
    }

    if let Some(items) = object.get("ending").and_then(|ending| ending.get("dialogue")) {
        locations.push(DialogueLocation {
            path: root.key("ending").key("dialogue"),
            mode: DialogueMode::Ending,
            items,
        });
    }

    locations
}

fn push<'a>(locations: &mut Vec<DialogueLocation<'a>>, items: &'a JsonValue, path: DocPath) {
    locations.push(DialogueLocation {
        path,
        mode: DialogueMode::Standard,
        items,
    });
}

fn push_keyed<'a>(
    locations: &mut Vec<DialogueLocation<'a>>,
    dialogues: &'a JsonObject,
    path: &DocPath,
) {
    for (id, items) in dialogues {
        push(locations, items, path.key(id.as_str()));
    }
}

pub(crate) fn validate_dialogue(
    location: &DialogueLocation<'_>,
    context: DialogueContext<'_>,
) -> Result<Dialogue, StorylineError> {
    validate_nodes(location, context).map_err(|error| error.in_dialogue(&location.path))
}

fn validate_nodes(
    location: &DialogueLocation<'_>,
    context: DialogueContext<'_>,
) -> Result<Dialogue, StorylineError> {
    let items = as_array(location.items, &location.path, KIND)?;
    let mut nodes = Vec::with_capacity(items.len());
    for (index, node) in items.iter().enumerate() {
        nodes.push(validate_node(
            node,
            &location.path.index(index),
            location.mode,
            context,
        )?);
    }
    Ok(Dialogue {
        location: location.path.clone(),
        nodes,
    })
}

fn validate_node(
    value: &JsonValue,
    path: &DocPath,
    mode: DialogueMode,
    context: DialogueContext<'_>,
) -> Result<DialogueNode, StorylineError> {
    let node = as_object(value, path, KIND)?;

    if mode == DialogueMode::Ending {
        let has_responses = node
            .get("responses")
            .is_some_and(|responses| responses.as_object().map_or(true, |map| !map.is_empty()));
        if has_responses {
            return Err(StorylineError::at(
                KIND,
                "DIALOGUE_ENDING_RESPONSES",
                &path.key("responses"),
                "Ending dialogue nodes must not have responses",
            ));
        }
    }

    let text = require(node, "text", path, KIND)?;
    let text = checked_text(text, &path.key("text"), context.languages, KIND)?;
    let cond = optional_expression(node, "cond", path, KIND, context.limits)?;

    let mut responses = Vec::new();
    if let Some(value) = node.get("responses") {
        let responses_path = path.key("responses");
        for (response_value, response) in as_object(value, &responses_path, KIND)? {
            responses.push(validate_response(
                response_value,
                response,
                &responses_path.key(response_value.as_str()),
                context,
            )?);
        }
    }

    Ok(DialogueNode {
        text,
        cond,
        responses,
    })
}

fn validate_response(
    response_value: &str,
    value: &JsonValue,
    path: &DocPath,
    context: DialogueContext<'_>,
) -> Result<Response, StorylineError> {
    let response = as_object(value, path, KIND)?;
    let text = require(response, "text", path, KIND)?;
    let text = checked_text(text, &path.key("text"), context.languages, KIND)?;
    let then_text = optional_checked_text(response, "thenText", path, context.languages, KIND)?;
    let cond = optional_expression(response, "cond", path, KIND, context.limits)?;
    let effects = match response.get("set") {
        Some(set) => validate_effects(set, &path.key("set"))?,
        None => Vec::new(),
    };

    Ok(Response {
        value: response_value.to_string(),
        path: path.clone(),
        text,
        then_text,
        cond,
        effects,
    })
}

fn validate_effects(value: &JsonValue, path: &DocPath) -> Result<Vec<FlagEffect>, StorylineError> {
    let mut effects = Vec::new();
    for (flag, target) in as_object(value, path, KIND)? {
        let flag_path = path.key(flag.as_str());
        if flag.trim().is_empty() {
            return Err(StorylineError::at(
                KIND,
                "DIALOGUE_FLAG_EMPTY",
                &flag_path,
                "flag name must not be empty",
            ));
        }
        effects.push(FlagEffect {
            flag: FlagKey::parse(flag),
            value: as_number(target, &flag_path, KIND)?,
        });
    }
    Ok(effects)
}
