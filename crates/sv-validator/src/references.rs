use crate::*;

const KIND: ErrorKind = ErrorKind::Reference;

pub(crate) fn validate_references(storyline: &Storyline) -> Result<(), StorylineError> {
    let npc_ids = storyline
        .npcs
        .iter()
        .map(|npc| npc.id.as_str())
        .collect::<BTreeSet<_>>();
    let quest_ids = storyline
        .quests
        .iter()
        .map(|quest| quest.id.as_str())
        .collect::<BTreeSet<_>>();

    for quest in &storyline.quests {
        if !npc_ids.contains(quest.npc.as_str()) {
            return Err(StorylineError::at(
                KIND,
                "REF_UNDEFINED_NPC",
                &quest_path(quest).key("npc"),
                format!("Quest {} references undefined npc {}", quest.id, quest.npc),
            ));
        }
    }

    for quest in &storyline.quests {
        for required in requirement_ids(quest) {
            if !quest_ids.contains(required) {
                return Err(StorylineError::at(
                    KIND,
                    "REF_UNDEFINED_QUEST",
                    &quest_path(quest).key("available").key("requirement"),
                    format!("Quest {} references undefined quest {}", quest.id, required),
                ));
            }
        }
    }

    validate_requirement_graph(storyline)?;
    validate_quest_flag_targets(storyline, &quest_ids)?;
    validate_activations(storyline)?;
    validate_completions(storyline)
}

pub fn settable_flags(storyline: &Storyline) -> BTreeSet<FlagKey> {
    let mut flags = storyline
        .all_responses()
        .into_iter()
        .flat_map(|response| response.effects.iter().map(|effect| effect.flag.clone()))
        .collect::<BTreeSet<_>>();
    flags.extend(
        storyline
            .all_counters()
            .into_iter()
            .filter_map(|counter| counter.set.clone()),
    );
    flags
}

fn quest_path(quest: &Quest) -> DocPath {
    DocPath::root().key("quests").key(quest.id.as_str())
}

fn requirement_ids(quest: &Quest) -> Vec<&str> {
    quest
        .available
        .as_ref()
        .and_then(|available| available.requirement.as_ref())
        .map(Requirement::quest_ids)
        .unwrap_or_default()
}

fn validate_requirement_graph(storyline: &Storyline) -> Result<(), StorylineError> {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum State {
        Visiting,
        Done,
    }

    fn dfs<'a>(
        quest_id: &'a str,
        edges: &HashMap<&'a str, Vec<&'a str>>,
        states: &mut HashMap<&'a str, State>,
        stack: &mut Vec<&'a str>,
    ) -> Result<(), StorylineError> {
        match states.get(quest_id) {
            Some(State::Visiting) => {
                let start = stack
                    .iter()
                    .position(|entry| *entry == quest_id)
                    .unwrap_or_default();
                let mut cycle = stack[start..].to_vec();
                cycle.push(quest_id);
                return Err(StorylineError::at(
                    KIND,
                    "REF_REQUIREMENT_CYCLE",
                    &DocPath::root()
                        .key("quests")
                        .key(quest_id)
                        .key("available")
                        .key("requirement"),
                    format!("Quest requirement cycle detected: {}", cycle.join(" -> ")),
                ));
            }
            Some(State::Done) => return Ok(()),
            None => {}
        }

        states.insert(quest_id, State::Visiting);
        stack.push(quest_id);
        for required in edges.get(quest_id).into_iter().flatten() {
            dfs(*required, edges, states, stack)?;
        }
        stack.pop();
        states.insert(quest_id, State::Done);
        Ok(())
    }

    let edges = storyline
        .quests
        .iter()
        .map(|quest| (quest.id.as_str(), requirement_ids(quest)))
        .collect::<HashMap<_, _>>();
    let mut states = HashMap::new();
    for quest in &storyline.quests {
        dfs(quest.id.as_str(), &edges, &mut states, &mut Vec::new())?;
    }
    Ok(())
}

fn validate_quest_flag_targets(
    storyline: &Storyline,
    quest_ids: &BTreeSet<&str>,
) -> Result<(), StorylineError> {
    let undefined = |flag: &FlagKey| {
        flag.activated_quest()
            .or_else(|| flag.completed_quest())
            .is_some_and(|quest_id| !quest_ids.contains(quest_id))
    };
    let error = |path: DocPath, flag: &FlagKey| {
        StorylineError::at(
            KIND,
            "REF_UNDEFINED_QUEST_FLAG",
            &path,
            format!("Flag {} refers to an undefined quest", flag),
        )
    };

    for response in storyline.all_responses() {
        for effect in &response.effects {
            if undefined(&effect.flag) {
                let path = response.path.key("set").key(effect.flag.to_string());
                return Err(error(path, &effect.flag));
            }
        }
    }
    for quest in &storyline.quests {
        for (index, stage) in quest.stages.iter().enumerate() {
            if let Some(flag) = stage.counter.as_ref().and_then(|counter| counter.set.as_ref()) {
                if undefined(flag) {
                    let path = quest_path(quest)
                        .key("stages")
                        .index(index)
                        .key("counter")
                        .key("set");
                    return Err(error(path, flag));
                }
            }
        }
    }
    Ok(())
}

fn validate_activations(storyline: &Storyline) -> Result<(), StorylineError> {
    let mut activations: HashMap<&str, Vec<&Response>> = HashMap::new();

    for response in storyline.all_responses() {
        let mut activated = response
            .effects
            .iter()
            .filter(|effect| effect.value != 0.0)
            .filter_map(|effect| effect.flag.activated_quest());
        let Some(primary) = activated.next() else {
            continue;
        };
        if let Some(other) = activated.find(|quest_id| *quest_id != primary) {
            return Err(StorylineError::at(
                KIND,
                "REF_MULTIPLE_ACTIVATIONS",
                &response.path.key("set"),
                format!(
                    "Response activating {} activates another quest ({})",
                    FlagKey::active(primary),
                    FlagKey::active(other)
                ),
            ));
        }
        activations.entry(primary).or_default().push(response);
    }

    for quest in &storyline.quests {
        match activations.get(quest.id.as_str()).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(StorylineError::at(
                    KIND,
                    "REF_QUEST_NEVER_ACTIVATED",
                    &quest_path(quest),
                    format!("Quest {} is never activated", quest.id),
                ))
            }
            Some([_]) => {}
            Some(many) => {
                let paths = many
                    .iter()
                    .map(|response| response.path.pointer())
                    .collect::<Vec<_>>();
                return Err(StorylineError::at(
                    KIND,
                    "REF_QUEST_ACTIVATED_TWICE",
                    &quest_path(quest),
                    format!(
                        "Quest {} is activated by more than one response ({})",
                        quest.id,
                        paths.join(", ")
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn validate_completions(storyline: &Storyline) -> Result<(), StorylineError> {
    let mut completed = storyline
        .all_responses()
        .into_iter()
        .flat_map(|response| response.effects.iter())
        .filter(|effect| effect.value != 0.0)
        .filter_map(|effect| effect.flag.completed_quest())
        .collect::<BTreeSet<_>>();
    completed.extend(
        storyline
            .all_counters()
            .into_iter()
            .filter_map(|counter| counter.set.as_ref())
            .filter_map(FlagKey::completed_quest),
    );

    for quest in &storyline.quests {
        if !completed.contains(quest.id.as_str()) {
            return Err(StorylineError::at(
                KIND,
                "REF_QUEST_NEVER_COMPLETED",
                &quest_path(quest),
                format!("Quest {} sets no flags to complete itself", quest.id),
            ));
        }
    }
    Ok(())
}
