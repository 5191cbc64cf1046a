use std::fmt::Display;

use sv_core::{ErrorKind, StorylineError};

fn map_error(code: &'static str, error: impl Display) -> StorylineError {
    StorylineError::new(ErrorKind::Source, code, error.to_string())
}

pub(crate) fn emit_error(error: StorylineError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_KIND:{}", error.kind.name());
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.to_string())
            .unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> StorylineError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_scan(error: walkdir::Error) -> StorylineError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> StorylineError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_config_read(error: std::io::Error) -> StorylineError {
    map_error("CLI_CONFIG_READ", error)
}

pub(crate) fn map_cli_config_invalid(error: toml::de::Error) -> StorylineError {
    map_error("CLI_CONFIG_INVALID", error)
}

pub(crate) fn map_cli_output(error: serde_json::Error) -> StorylineError {
    map_error("CLI_OUTPUT", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(StorylineError::new(ErrorKind::Schema, "ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        assert_eq!(
            map_cli_source_read(std::io::Error::other("read")).code,
            "CLI_SOURCE_READ"
        );
        assert_eq!(
            map_cli_config_read(std::io::Error::other("read")).code,
            "CLI_CONFIG_READ"
        );

        let scan = walkdir::WalkDir::new(std::env::temp_dir().join("storyline-lint-missing-root"))
            .into_iter()
            .find_map(Result::err)
            .expect("missing root should fail to scan");
        assert_eq!(map_cli_source_scan(scan).code, "CLI_SOURCE_SCAN");

        let invalid = toml::from_str::<toml::Table>("[validator").expect_err("invalid toml");
        let mapped = map_cli_config_invalid(invalid);
        assert_eq!(mapped.code, "CLI_CONFIG_INVALID");
        assert_eq!(mapped.kind, ErrorKind::Source);

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_output(invalid).code, "CLI_OUTPUT");
    }
}
