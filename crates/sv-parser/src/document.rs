use std::path::Path;

use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use sv_core::{DocPath, ErrorKind, StorylineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parses authored storyline text into the JSON value model the validator
/// walks. YAML scalar mapping keys (`1:`, `true:`) become strings.
pub fn parse_storyline_source(
    source: &str,
    format: DocumentFormat,
) -> Result<JsonValue, StorylineError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(source).map_err(|error| {
            StorylineError::new(ErrorKind::Source, "DOCUMENT_PARSE_ERROR", error.to_string())
        }),
        DocumentFormat::Yaml => {
            let yaml = serde_yaml::from_str::<YamlValue>(source).map_err(|error| {
                StorylineError::new(ErrorKind::Source, "DOCUMENT_PARSE_ERROR", error.to_string())
            })?;
            yaml_to_json(yaml, &DocPath::root())
        }
    }
}

fn yaml_to_json(value: YamlValue, path: &DocPath) -> Result<JsonValue, StorylineError> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(value) => JsonValue::Bool(value),
        YamlValue::Number(number) => {
            if let Some(value) = number.as_i64() {
                JsonValue::from(value)
            } else if let Some(value) = number.as_u64() {
                JsonValue::from(value)
            } else {
                let value = number.as_f64().unwrap_or(f64::NAN);
                JsonNumber::from_f64(value)
                    .map(JsonValue::Number)
                    .ok_or_else(|| {
                        StorylineError::at(
                            ErrorKind::Source,
                            "DOCUMENT_NUMBER_UNSUPPORTED",
                            path,
                            format!("unsupported number {}", number),
                        )
                    })?
            }
        }
        YamlValue::String(value) => JsonValue::String(value),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| yaml_to_json(item, &path.index(index)))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = JsonMap::new();
            for (key, item) in mapping {
                let key = yaml_key(key, path)?;
                let child = path.key(key.clone());
                object.insert(key, yaml_to_json(item, &child)?);
            }
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, path)?,
    })
}

fn yaml_key(key: YamlValue, path: &DocPath) -> Result<String, StorylineError> {
    match key {
        YamlValue::String(value) => Ok(value),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Bool(value) => Ok(value.to_string()),
        _ => Err(StorylineError::at(
            ErrorKind::Source,
            "DOCUMENT_KEY_UNSUPPORTED",
            path,
            "mapping keys must be strings, numbers, or booleans",
        )),
    }
}
