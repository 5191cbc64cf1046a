use crate::*;

const KIND: ErrorKind = ErrorKind::Schema;

pub(crate) struct ModelBuilder<'a> {
    languages: &'a [String],
    limits: ExprLimits,
    dialogues: HashMap<DocPath, Dialogue>,
}

impl<'a> ModelBuilder<'a> {
    pub(crate) fn new(
        languages: &'a [String],
        limits: ExprLimits,
        dialogues: HashMap<DocPath, Dialogue>,
    ) -> Self {
        Self {
            languages,
            limits,
            dialogues,
        }
    }

    pub(crate) fn build(mut self, document: &JsonValue) -> Result<Storyline, StorylineError> {
        let root = DocPath::root();
        let object = as_object(document, &root, KIND)?;

        let decision = self.optional_text(object, "decision", &root)?;
        let prompt = self.optional_text(object, "prompt", &root)?;

        let mut npcs = Vec::new();
        if let Some(value) = object.get("npcs") {
            let path = root.key("npcs");
            for (id, npc) in as_object(value, &path, KIND)? {
                npcs.push(self.build_npc(id, npc, &path.key(id.as_str()))?);
            }
        }

        let mut quests = Vec::new();
        if let Some(value) = object.get("quests") {
            let path = root.key("quests");
            for (id, quest) in as_object(value, &path, KIND)? {
                quests.push(self.build_quest(id, quest, &path.key(id.as_str()))?);
            }
        }

        let mut scenery = Vec::new();
        if let Some(value) = object.get("scenery") {
            let path = root.key("scenery");
            for (id, item) in as_object(value, &path, KIND)? {
                scenery.push(self.build_scenery_item(id, item, &path.key(id.as_str()))?);
            }
        }

        let dialogues = match object.get("dialogues") {
            Some(value) => self.keyed_dialogues(value, &root.key("dialogues"))?,
            None => Vec::new(),
        };

        let ending = match object.get("ending") {
            Some(value) => {
                let path = root.key("ending");
                as_object(value, &path, KIND)?;
                Some(Ending {
                    dialogue: self.take_dialogue(&path.key("dialogue")),
                })
            }
            None => None,
        };

        let enabled = match object.get("enabled") {
            Some(value) => as_bool(value, &root.key("enabled"), KIND)?,
            None => true,
        };

        Ok(Storyline {
            languages: self.languages.to_vec(),
            enabled,
            prompt,
            decision,
            dialogues,
            npcs,
            quests,
            scenery,
            ending,
        })
    }

    fn build_npc(&mut self, id: &str, value: &JsonValue, path: &DocPath) -> Result<Npc, StorylineError> {
        let npc = as_object(value, path, KIND)?;
        let name = require(npc, "name", path, KIND)?;
        Ok(Npc {
            id: id.to_string(),
            name: checked_text(name, &path.key("name"), self.languages, KIND)?,
            spawn: build_spawn(require(npc, "spawn", path, KIND)?, &path.key("spawn"))?,
            direction: optional_str(npc, "direction", path, KIND)?.map(str::to_string),
            dialogue: self.take_dialogue(&path.key("dialogue")),
            act_as: optional_str(npc, "actAs", path, KIND)?.map(str::to_string),
        })
    }

    fn build_quest(&mut self, id: &str, value: &JsonValue, path: &DocPath) -> Result<Quest, StorylineError> {
        let quest = as_object(value, path, KIND)?;
        let npc = as_str(require(quest, "npc", path, KIND)?, &path.key("npc"), KIND)?;
        let prompt = self.optional_text(quest, "prompt", path)?;
        let progressive_prompt = self.optional_text(quest, "progressivePrompt", path)?;

        let available = match quest.get("available") {
            Some(value) => Some(self.build_availability(value, &path.key("available"))?),
            None => None,
        };

        let mut stages = Vec::new();
        if let Some(value) = quest.get("stages") {
            let stages_path = path.key("stages");
            for (index, stage) in as_array(value, &stages_path, KIND)?.iter().enumerate() {
                stages.push(self.build_stage(stage, &stages_path.index(index))?);
            }
        }

        let dialogues = match quest.get("dialogues") {
            Some(value) => self.keyed_dialogues(value, &path.key("dialogues"))?,
            None => Vec::new(),
        };

        Ok(Quest {
            id: id.to_string(),
            npc: npc.to_string(),
            prompt,
            progressive_prompt,
            available,
            stages,
            dialogues,
        })
    }

    fn build_availability(
        &mut self,
        value: &JsonValue,
        path: &DocPath,
    ) -> Result<Availability, StorylineError> {
        let available = as_object(value, path, KIND)?;
        let requirement = match available.get("requirement") {
            Some(JsonValue::String(id)) => Some(Requirement::Single(id.clone())),
            Some(JsonValue::Array(items)) => {
                let requirement_path = path.key("requirement");
                let ids = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        as_str(item, &requirement_path.index(index), KIND).map(str::to_string)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Some(Requirement::All(ids))
            }
            Some(_) => {
                return Err(type_error(
                    KIND,
                    &path.key("requirement"),
                    "a quest ID or an array of quest IDs",
                ))
            }
            None => None,
        };

        Ok(Availability {
            dialogue: self.take_dialogue(&path.key("dialogue")),
            requirement,
            cond: optional_expression(available, "cond", path, KIND, self.limits)?,
        })
    }

    fn build_stage(&mut self, value: &JsonValue, path: &DocPath) -> Result<Stage, StorylineError> {
        let stage = as_object(value, path, KIND)?;
        let prompt = self.optional_text(stage, "prompt", path)?;
        let cond = optional_expression(stage, "cond", path, KIND, self.limits)?;
        let counter = match stage.get("counter") {
            Some(value) => Some(self.build_counter(value, &path.key("counter"))?),
            None => None,
        };
        Ok(Stage {
            prompt,
            cond,
            counter,
            dialogue: self.take_dialogue(&path.key("dialogue")),
        })
    }

    fn build_counter(&self, value: &JsonValue, path: &DocPath) -> Result<Counter, StorylineError> {
        match value {
            JsonValue::String(source) => Ok(Counter {
                expression: parse_expression_at(source, path, self.limits)?,
                set: None,
                max: None,
            }),
            JsonValue::Object(counter) => {
                let source = as_str(
                    require(counter, "expression", path, KIND)?,
                    &path.key("expression"),
                    KIND,
                )?;
                Ok(Counter {
                    expression: parse_expression_at(
                        source,
                        &path.key("expression"),
                        self.limits,
                    )?,
                    set: optional_str(counter, "set", path, KIND)?.map(FlagKey::parse),
                    max: counter
                        .get("max")
                        .map(|max| as_integer(max, &path.key("max"), KIND))
                        .transpose()?,
                })
            }
            _ => Err(type_error(KIND, path, "a string or an object")),
        }
    }

    fn build_scenery_item(
        &self,
        id: &str,
        value: &JsonValue,
        path: &DocPath,
    ) -> Result<SceneryItem, StorylineError> {
        let item = as_object(value, path, KIND)?;
        Ok(SceneryItem {
            id: id.to_string(),
            kind: optional_str(item, "type", path, KIND)?.map(str::to_string),
            layer: optional_str(item, "layer", path, KIND)?.map(str::to_string),
            spawn: build_spawn(require(item, "spawn", path, KIND)?, &path.key("spawn"))?,
            direction: optional_str(item, "direction", path, KIND)?.map(str::to_string),
            z_index: optional_number(item, "zIndex", path, KIND)?,
            cond: optional_expression(item, "cond", path, KIND, self.limits)?,
        })
    }

    fn keyed_dialogues(&mut self, value: &JsonValue, path: &DocPath) -> Result<Vec<Dialogue>, StorylineError> {
        let mut dialogues = Vec::new();
        for id in as_object(value, path, KIND)?.keys() {
            if let Some(dialogue) = self.take_dialogue(&path.key(id.as_str())) {
                dialogues.push(dialogue);
            }
        }
        Ok(dialogues)
    }

    fn take_dialogue(&mut self, path: &DocPath) -> Option<Dialogue> {
        self.dialogues.remove(path)
    }

    fn optional_text(
        &self,
        object: &JsonObject,
        property: &str,
        path: &DocPath,
    ) -> Result<Option<TextValue>, StorylineError> {
        optional_checked_text(object, property, path, self.languages, KIND)
    }
}

fn build_spawn(value: &JsonValue, path: &DocPath) -> Result<Spawn, StorylineError> {
    let spawn = as_object(value, path, KIND)?;
    Ok(Spawn {
        x: as_number(require(spawn, "x", path, KIND)?, &path.key("x"), KIND)?,
        y: as_number(require(spawn, "y", path, KIND)?, &path.key("y"), KIND)?,
    })
}
