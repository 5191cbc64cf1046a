use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use sv_core::{ErrorKind, StorylineError};
use sv_parser::{parse_storyline_source, DocumentFormat};
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan};

/// One storyline document ready for validation.
#[derive(Debug, Clone)]
pub(crate) struct StorylineSource {
    pub(crate) label: String,
    pub(crate) document: JsonValue,
}

/// Expands the command line paths into the storyline files they name.
/// Directories are walked recursively in sorted order.
pub(crate) fn collect_storyline_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, StorylineError> {
    let mut files = Vec::new();

    for path in paths {
        let absolute = resolve_source_path(path)?;
        if absolute.is_file() {
            if DocumentFormat::from_path(&absolute).is_none() {
                return Err(StorylineError::new(
                    ErrorKind::Source,
                    "CLI_SOURCE_FORMAT",
                    format!("unsupported storyline file: {}", absolute.display()),
                ));
            }
            files.push(absolute);
            continue;
        }

        for entry in WalkDir::new(&absolute).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(map_cli_source_scan)?;
            if entry.file_type().is_file() && DocumentFormat::from_path(entry.path()).is_some() {
                files.push(entry.into_path());
            }
        }
    }

    if files.is_empty() {
        return Err(StorylineError::new(
            ErrorKind::Source,
            "CLI_SOURCE_EMPTY",
            "No .yml/.yaml/.json storyline files found",
        ));
    }

    Ok(files)
}

pub(crate) fn resolve_source_path(path: &Path) -> Result<PathBuf, StorylineError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(StorylineError::new(
            ErrorKind::Source,
            "CLI_SOURCE_NOT_FOUND",
            format!("path does not exist: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

/// Reads one file. A root `storylines` mapping makes it a bundle whose
/// entries are labelled `<file>#<id>`.
pub(crate) fn load_storylines(path: &Path) -> Result<Vec<StorylineSource>, StorylineError> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        StorylineError::new(
            ErrorKind::Source,
            "CLI_SOURCE_FORMAT",
            format!("unsupported storyline file: {}", path.display()),
        )
    })?;
    let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
    let document = parse_storyline_source(&content, format)?;
    let label = path.display().to_string();

    match document.get("storylines").and_then(JsonValue::as_object) {
        Some(bundle) => Ok(bundle
            .iter()
            .map(|(id, document)| StorylineSource {
                label: format!("{}#{}", label, id),
                document: document.clone(),
            })
            .collect()),
        None => Ok(vec![StorylineSource { label, document }]),
    }
}
