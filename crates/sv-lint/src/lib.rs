use std::ffi::OsString;

use clap::Parser;
use sv_core::StorylineError;
use sv_parser::{parse_expression_with_limits, ExprLimits};
use sv_validator::validate_storyline;
use tracing::{info, warn};

mod cli_args;
mod config;
mod error_map;
mod source_loader;

pub(crate) use cli_args::{CheckArgs, Cli, ExprArgs, Mode};
pub(crate) use config::load_validator_config;
pub(crate) use error_map::{
    emit_error, map_cli_config_invalid, map_cli_config_read, map_cli_output, map_cli_source_path,
    map_cli_source_read, map_cli_source_scan,
};
pub(crate) use source_loader::{collect_storyline_files, load_storylines};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, StorylineError> {
    match cli.command {
        Mode::Check(args) => run_check(args),
        Mode::Expr(args) => run_expr(args),
    }
}

fn run_check(args: CheckArgs) -> Result<i32, StorylineError> {
    let mut config = load_validator_config(args.config.as_deref())?;
    if let Some(languages) = args.languages {
        config = config.with_languages(languages);
    }
    let files = collect_storyline_files(&args.paths)?;

    let mut failures = 0usize;
    for file in files {
        info!(file = %file.display(), "checking storyline file");
        let sources = match load_storylines(&file) {
            Ok(sources) => sources,
            Err(error) => {
                println!("FILE:{}", file.display());
                emit_error(error);
                failures += 1;
                continue;
            }
        };

        for source in sources {
            println!("FILE:{}", source.label);
            match validate_storyline(&source.document, &config) {
                Ok(_) => println!("RESULT:OK"),
                Err(error) => {
                    warn!(storyline = %source.label, code = %error.code, "storyline rejected");
                    emit_error(error);
                    failures += 1;
                }
            }
        }
    }

    Ok(if failures == 0 { 0 } else { 1 })
}

fn run_expr(args: ExprArgs) -> Result<i32, StorylineError> {
    let defaults = ExprLimits::default();
    let limits = ExprLimits {
        max_depth: args.max_depth.unwrap_or(defaults.max_depth),
        max_terms: args.max_terms.unwrap_or(defaults.max_terms),
    };
    let expr = parse_expression_with_limits(&args.expression, limits)?;
    let json = serde_json::to_string(&expr).map_err(map_cli_output)?;
    println!("RESULT:OK");
    println!("EXPR:{}", expr);
    println!("AST_JSON:{}", json);
    Ok(0)
}
