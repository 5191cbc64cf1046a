use crate::*;

pub(crate) type JsonObject = JsonMap<String, JsonValue>;

pub(crate) fn type_error(kind: ErrorKind, path: &DocPath, expected: &str) -> StorylineError {
    StorylineError::at(kind, "SCHEMA_TYPE", path, format!("must be {}", expected))
}

pub(crate) fn required_error(kind: ErrorKind, path: &DocPath, property: &str) -> StorylineError {
    StorylineError::at(
        kind,
        "SCHEMA_REQUIRED",
        path,
        format!("must have required property '{}'", property),
    )
}

pub(crate) fn as_object<'a>(
    value: &'a JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<&'a JsonObject, StorylineError> {
    value
        .as_object()
        .ok_or_else(|| type_error(kind, path, "object"))
}

pub(crate) fn as_array<'a>(
    value: &'a JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<&'a Vec<JsonValue>, StorylineError> {
    value.as_array().ok_or_else(|| type_error(kind, path, "array"))
}

pub(crate) fn as_str<'a>(
    value: &'a JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<&'a str, StorylineError> {
    value.as_str().ok_or_else(|| type_error(kind, path, "string"))
}

pub(crate) fn as_number(
    value: &JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<f64, StorylineError> {
    value.as_f64().ok_or_else(|| type_error(kind, path, "number"))
}

pub(crate) fn as_integer(
    value: &JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<i64, StorylineError> {
    value.as_i64().ok_or_else(|| type_error(kind, path, "integer"))
}

pub(crate) fn as_bool(
    value: &JsonValue,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<bool, StorylineError> {
    value.as_bool().ok_or_else(|| type_error(kind, path, "boolean"))
}

pub(crate) fn require<'a>(
    object: &'a JsonObject,
    property: &str,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<&'a JsonValue, StorylineError> {
    object
        .get(property)
        .ok_or_else(|| required_error(kind, path, property))
}

pub(crate) fn optional_str<'a>(
    object: &'a JsonObject,
    property: &str,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<Option<&'a str>, StorylineError> {
    object
        .get(property)
        .map(|value| as_str(value, &path.key(property), kind))
        .transpose()
}

pub(crate) fn optional_number(
    object: &JsonObject,
    property: &str,
    path: &DocPath,
    kind: ErrorKind,
) -> Result<Option<f64>, StorylineError> {
    object
        .get(property)
        .map(|value| as_number(value, &path.key(property), kind))
        .transpose()
}
