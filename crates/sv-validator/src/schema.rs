use crate::*;

const KIND: ErrorKind = ErrorKind::Schema;

pub(crate) const NPC_SHAPE_MESSAGE: &str =
    "must have name, spawn, and at least one of dialogue or actAs properties.";

// Dialogue arrays are only checked for being arrays; nodes belong to the dialogue pass.
pub(crate) fn validate_schema(document: &JsonValue) -> Result<(), StorylineError> {
    let root = DocPath::root();
    let object = as_object(document, &root, KIND)?;

    for property in ["decision", "prompt"] {
        if let Some(value) = object.get(property) {
            parse_text(value, &root.key(property), KIND)?;
        }
    }
    if let Some(languages) = object.get("languages") {
        let path = root.key("languages");
        for (index, language) in as_array(languages, &path, KIND)?.iter().enumerate() {
            as_str(language, &path.index(index), KIND)?;
        }
    }
    if let Some(enabled) = object.get("enabled") {
        as_bool(enabled, &root.key("enabled"), KIND)?;
    }
    if let Some(npcs) = object.get("npcs") {
        validate_npcs(npcs, &root.key("npcs"))?;
    }
    if let Some(quests) = object.get("quests") {
        validate_quests(quests, &root.key("quests"))?;
    }
    if let Some(scenery) = object.get("scenery") {
        validate_scenery(scenery, &root.key("scenery"))?;
    }
    if let Some(dialogues) = object.get("dialogues") {
        validate_dialogue_map(dialogues, &root.key("dialogues"))?;
    }
    if let Some(ending) = object.get("ending") {
        let path = root.key("ending");
        let ending = as_object(ending, &path, KIND)?;
        if let Some(dialogue) = ending.get("dialogue") {
            as_array(dialogue, &path.key("dialogue"), KIND)?;
        }
    }

    Ok(())
}

fn validate_npcs(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    for (id, npc) in as_object(value, path, KIND)? {
        let npc_path = path.key(id.as_str());
        let npc = as_object(npc, &npc_path, KIND)?;

        let spawn = require(npc, "spawn", &npc_path, KIND)?;
        validate_spawn(spawn, &npc_path.key("spawn"))?;

        let has_behavior = npc.contains_key("dialogue") || npc.contains_key("actAs");
        let name = match npc.get("name") {
            Some(name) if has_behavior => name,
            _ => {
                return Err(StorylineError::at(
                    KIND,
                    "SCHEMA_NPC_SHAPE",
                    &npc_path,
                    NPC_SHAPE_MESSAGE,
                ))
            }
        };

        parse_text(name, &npc_path.key("name"), KIND)?;
        if let Some(dialogue) = npc.get("dialogue") {
            as_array(dialogue, &npc_path.key("dialogue"), KIND)?;
        }
        optional_str(npc, "actAs", &npc_path, KIND)?;
        optional_str(npc, "direction", &npc_path, KIND)?;
    }
    Ok(())
}

fn validate_quests(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    for (id, quest) in as_object(value, path, KIND)? {
        let quest_path = path.key(id.as_str());
        let quest = as_object(quest, &quest_path, KIND)?;

        let npc = require(quest, "npc", &quest_path, KIND)?;
        as_str(npc, &quest_path.key("npc"), KIND)?;

        for property in ["prompt", "progressivePrompt"] {
            if let Some(text) = quest.get(property) {
                parse_text(text, &quest_path.key(property), KIND)?;
            }
        }
        if let Some(available) = quest.get("available") {
            validate_available(available, &quest_path.key("available"))?;
        }
        if let Some(stages) = quest.get("stages") {
            let stages_path = quest_path.key("stages");
            for (index, stage) in as_array(stages, &stages_path, KIND)?.iter().enumerate() {
                validate_stage(stage, &stages_path.index(index))?;
            }
        }
        if let Some(dialogues) = quest.get("dialogues") {
            validate_dialogue_map(dialogues, &quest_path.key("dialogues"))?;
        }
    }
    Ok(())
}

fn validate_available(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    let available = as_object(value, path, KIND)?;
    if let Some(dialogue) = available.get("dialogue") {
        as_array(dialogue, &path.key("dialogue"), KIND)?;
    }
    if let Some(requirement) = available.get("requirement") {
        validate_requirement(requirement, &path.key("requirement"))?;
    }
    optional_str(available, "cond", path, KIND)?;
    Ok(())
}

fn validate_requirement(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    let valid = match value {
        JsonValue::String(_) => true,
        JsonValue::Array(items) => items.iter().all(JsonValue::is_string),
        _ => false,
    };
    if valid {
        return Ok(());
    }
    Err(StorylineError::at(
        KIND,
        "SCHEMA_REQUIREMENT",
        path,
        "must be a quest ID or an array of quest IDs",
    ))
}

fn validate_stage(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    let stage = as_object(value, path, KIND)?;
    if let Some(prompt) = stage.get("prompt") {
        parse_text(prompt, &path.key("prompt"), KIND)?;
    }
    optional_str(stage, "cond", path, KIND)?;
    if let Some(counter) = stage.get("counter") {
        validate_counter(counter, &path.key("counter"))?;
    }
    if let Some(dialogue) = stage.get("dialogue") {
        as_array(dialogue, &path.key("dialogue"), KIND)?;
    }
    Ok(())
}

fn validate_counter(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    match value {
        JsonValue::String(_) => Ok(()),
        JsonValue::Object(counter) => {
            let expression = require(counter, "expression", path, KIND)?;
            as_str(expression, &path.key("expression"), KIND)?;
            optional_str(counter, "set", path, KIND)?;
            if let Some(max) = counter.get("max") {
                as_integer(max, &path.key("max"), KIND)?;
            }
            Ok(())
        }
        _ => Err(StorylineError::at(
            KIND,
            "SCHEMA_COUNTER",
            path,
            "must be a string or an object",
        )),
    }
}

fn validate_scenery(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    for (id, item) in as_object(value, path, KIND)? {
        let item_path = path.key(id.as_str());
        let item = as_object(item, &item_path, KIND)?;
        let spawn = require(item, "spawn", &item_path, KIND)?;
        validate_spawn(spawn, &item_path.key("spawn"))?;
        for property in ["type", "layer", "direction", "cond"] {
            optional_str(item, property, &item_path, KIND)?;
        }
        optional_number(item, "zIndex", &item_path, KIND)?;
    }
    Ok(())
}

fn validate_spawn(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    let spawn = as_object(value, path, KIND)?;
    for axis in ["x", "y"] {
        let coordinate = require(spawn, axis, path, KIND)?;
        as_number(coordinate, &path.key(axis), KIND)?;
    }
    Ok(())
}

fn validate_dialogue_map(value: &JsonValue, path: &DocPath) -> Result<(), StorylineError> {
    for (id, dialogue) in as_object(value, path, KIND)? {
        as_array(dialogue, &path.key(id.as_str()), KIND)?;
    }
    Ok(())
}
