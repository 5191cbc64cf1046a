use std::fs;
use std::path::Path;

use serde::Deserialize;
use sv_core::{ErrorKind, StorylineError};
use sv_validator::ValidatorConfig;
use tracing::debug;

use crate::{map_cli_config_invalid, map_cli_config_read};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "storyline-lint.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LintConfigFile {
    validator: ValidatorConfig,
}

/// Loads the `[validator]` table from `explicit`, or from
/// `storyline-lint.toml` in the working directory when that file exists.
pub(crate) fn load_validator_config(explicit: Option<&Path>) -> Result<ValidatorConfig, StorylineError> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(StorylineError::new(
                ErrorKind::Source,
                "CLI_CONFIG_NOT_FOUND",
                format!("config file does not exist: {}", path.display()),
            ))
        }
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                return Ok(ValidatorConfig::default());
            }
            fallback.to_path_buf()
        }
    };

    debug!(path = %path.display(), "loading lint config");
    let raw = fs::read_to_string(&path).map_err(map_cli_config_read)?;
    parse_validator_config(&raw)
}

pub(crate) fn parse_validator_config(raw: &str) -> Result<ValidatorConfig, StorylineError> {
    let file: LintConfigFile = toml::from_str(raw).map_err(map_cli_config_invalid)?;
    Ok(file.validator)
}
