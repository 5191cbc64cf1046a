use std::fs;
use std::path::PathBuf;

use serde_json::Value as JsonValue;
use sv_core::{ErrorKind, StorylineError};
use sv_parser::{parse_storyline_source, DocumentFormat};

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures").join("storylines")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_root().join(name)
}

/// Reads and parses a fixture such as `schema/minimal.yml`.
pub fn load_fixture(name: &str) -> Result<JsonValue, StorylineError> {
    let path = fixture_path(name);
    let format = DocumentFormat::from_path(&path).ok_or_else(|| {
        StorylineError::new(
            ErrorKind::Source,
            "FIXTURE_FORMAT",
            format!("Unsupported fixture extension: {}", path.display()),
        )
    })?;
    let source = fs::read_to_string(&path).map_err(|error| {
        StorylineError::new(
            ErrorKind::Source,
            "FIXTURE_READ",
            format!("Failed to read fixture {}: {}", path.display(), error),
        )
    })?;
    parse_storyline_source(&source, format)
}
