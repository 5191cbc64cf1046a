use crate::*;

pub(crate) fn parse_text(
    value: &JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<TextValue, StorylineError> {
    match value {
        JsonValue::String(text) => Ok(TextValue::Literal(text.clone())),
        JsonValue::Object(entries) => {
            let mut texts = BTreeMap::new();
            for (language, text) in entries {
                let text = as_str(text, &path.key(language.as_str()), kind)?;
                texts.insert(language.clone(), text.to_string());
            }
            Ok(TextValue::PerLanguage(texts))
        }
        _ => Err(StorylineError::at(
            kind,
            "SCHEMA_TEXT",
            path,
            "must be a string or an object",
        )),
    }
}

pub(crate) fn check_text_complete(
    text: &TextValue,
    path: &DocPath,
    languages: &[String],
) -> Result<(), StorylineError> {
    match text.missing_language(languages) {
        Some(language) => Err(StorylineError::at(
            ErrorKind::TextCompleteness,
            "TEXT_MISSING_LANGUAGE",
            path,
            format!("Missing text for language '{}'", language),
        )),
        None => Ok(()),
    }
}

pub(crate) fn checked_text(
    value: &JsonValue,
    path: &DocPath,
    languages: &[String],
    kind: ErrorKind,
) -> Result<TextValue, StorylineError> {
    let text = parse_text(value, path, kind)?;
    check_text_complete(&text, path, languages)?;
    Ok(text)
}

pub(crate) fn optional_checked_text(
    object: &JsonObject,
    property: &str,
    path: &DocPath,
    languages: &[String],
    kind: ErrorKind,
) -> Result<Option<TextValue>, StorylineError> {
    object
        .get(property)
        .map(|value| checked_text(value, &path.key(property), languages, kind))
        .transpose()
}
