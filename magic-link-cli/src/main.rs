//! Command-line interface for magic-link
//! This binary renders markdown files with magic links and resolves single tokens for inspection.
//!
//! Usage:
//!   magic-link render `<path>` [--config `<file>`] [--set `<key=value>`]...
//!       Render a markdown file to HTML
//!   magic-link resolve `<token>` [--config `<file>`] [--set `<key=value>`]...
//!       Print the resolved link as JSON
//!
//! Without `--config`, `magic-link.toml` in the working directory is used when present.
//! `--set` settings apply on top of every file, e.g. `--set default_platform.host=gitlab.com`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use magic_link_babel::MarkdownRenderer;
use magic_link_config::{LoadError, Loader};
use magic_link_parser::magic::matcher::match_token;
use magic_link_parser::MagicLink;
use markdown_it::parser::linkfmt::MDLinkFormatter;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOCAL_CONFIG: &str = "magic-link.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<magic_link_config::ConfigError> for CliError {
    fn from(err: magic_link_config::ConfigError) -> Self {
        CliError::Config(LoadError::Config(err))
    }
}

fn main() -> ExitCode {
    let matches = Command::new("magic-link")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render {magic link} tokens in markdown")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .action(ArgAction::Append)
                .value_name("KEY=VALUE")
                .value_parser(parse_setting)
                .help("Override one configuration key"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a markdown file to HTML on stdout")
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve one token and print the link as JSON")
                .arg(
                    Arg::new("token")
                        .help("Token, with or without the surrounding braces")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    init_logging();

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn parse_setting(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let settings = matches
        .get_many::<(String, String)>("set")
        .into_iter()
        .flatten()
        .cloned();
    let magic = load_magic_link(matches.get_one::<PathBuf>("config"), settings)?;

    match matches.subcommand() {
        Some(("render", sub)) => {
            let path = sub
                .get_one::<PathBuf>("path")
                .expect("path is a required argument");
            handle_render_command(magic, path)
        }
        Some(("resolve", sub)) => {
            let token = sub
                .get_one::<String>("token")
                .expect("token is a required argument");
            handle_resolve_command(&magic, token)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn load_magic_link(
    config: Option<&PathBuf>,
    settings: impl Iterator<Item = (String, String)>,
) -> Result<MagicLink, CliError> {
    let loader = match config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            Loader::new().with_file(path)
        }
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    let options = loader.with_settings(settings)?.build_options()?;
    Ok(MagicLink::new(options))
}

/// Handle the render command
fn handle_render_command(magic: MagicLink, path: &Path) -> Result<ExitCode, CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let html = MarkdownRenderer::new(magic).render(&source);
    print!("{html}");
    Ok(ExitCode::SUCCESS)
}

/// Handle the resolve command
///
/// The token goes through the same boundary check as tokens in a document, so a payload the
/// inline rule would reject is rejected here too.
fn handle_resolve_command(magic: &MagicLink, token: &str) -> Result<ExitCode, CliError> {
    let token = if token.starts_with('{') {
        token.to_string()
    } else {
        format!("{{{token}}}")
    };

    let resolved = match_token(&token, 0)
        .filter(|matched| matched.consumed == token.len())
        .and_then(|matched| magic.resolve(matched.payload, &MDLinkFormatter::new()));

    match resolved {
        Some(resolved) => {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No handler resolves `{token}`");
            Ok(ExitCode::FAILURE)
        }
    }
}
