use crate::*;

pub fn validate_storyline(
    document: &JsonValue,
    config: &ValidatorConfig,
) -> Result<Storyline, StorylineError> {
    debug!("validating storyline schema");
    validate_schema(document)?;

    let languages = resolve_languages(document, config);
    debug!(languages = ?languages, "resolved storyline languages");

    let dialogues = validate_dialogues(document, &languages, config)?;

    debug!("building storyline model");
    let storyline =
        ModelBuilder::new(&languages, config.expr_limits(), dialogues).build(document)?;

    debug!(
        npcs = storyline.npcs.len(),
        quests = storyline.quests.len(),
        "validating storyline references"
    );
    validate_references(&storyline)?;
    Ok(storyline)
}

pub fn resolve_languages(document: &JsonValue, config: &ValidatorConfig) -> Vec<String> {
    let declared = document
        .get("languages")
        .and_then(JsonValue::as_array)
        .map(|languages| {
            languages
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
    match declared {
        Some(languages) if !languages.is_empty() => languages,
        _ => config.languages.clone(),
    }
}

fn validate_dialogues(
    document: &JsonValue,
    languages: &[String],
    config: &ValidatorConfig,
) -> Result<HashMap<DocPath, Dialogue>, StorylineError> {
    let context = DialogueContext {
        languages,
        limits: config.expr_limits(),
    };

    let mut dialogues = HashMap::new();
    let mut first_error = None;
    for location in collect_dialogue_locations(document) {
        trace!(location = %location.path.dotted(), "validating dialogue");
        match validate_dialogue(&location, context) {
            Ok(dialogue) => {
                dialogues.insert(location.path, dialogue);
            }
            Err(error) => {
                trace!(error = %error, "dialogue rejected");
                first_error.get_or_insert(error);
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(dialogues),
    }
}
