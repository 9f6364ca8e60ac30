use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use git_semver::{config, ui, BumpType, VersionResolver, VersioningError};

#[derive(clap::Parser)]
#[command(
    name = "git-semver",
    version,
    about = "Derive a semantic version from the nearest git tag"
)]
struct Args {
    #[arg(
        long,
        value_name = "TYPE",
        value_parser = parse_bump_type,
        help = "Print the next release version instead (major, minor or patch)"
    )]
    next: Option<BumpType>,

    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        help = "Run as if started in DIR instead of the current directory"
    )]
    directory: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH", help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Log git queries to stderr")]
    verbose: bool,
}

fn parse_bump_type(value: &str) -> std::result::Result<BumpType, VersioningError> {
    value.parse()
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let rendered = e.render().to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            ui::display_error(&VersioningError::usage(reason).to_string());
            ui::display_usage(&Args::command().render_help().to_string());
            return ExitCode::from(1);
        }
    };

    init_tracing(args.verbose);

    match run(args) {
        Ok(version) => {
            println!("{}", version);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<String> {
    let work_dir = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let config = config::load_config(args.config.as_deref(), &work_dir)?;
    let repo = config
        .git
        .repository(work_dir.clone(), std::env::var_os("PATH"));
    let resolver = VersionResolver::new(repo);

    let version = match args.next {
        Some(bump) => resolver.next_version(bump)?,
        None => resolver.current_version()?,
    };

    Ok(version)
}
