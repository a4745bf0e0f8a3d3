//! movietag command-line entry point
//!
//! Parses options, sets up logging and the metadata backend, then runs the
//! batch over the given paths or directory.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use movie_tag::config::{ConfigBuilder, TagConfig, parse_mode};
use movie_tag::lookup::{ImdbService, MovieLookupService, TmdbService};
use movie_tag::notifications::banner;
use movie_tag::resolver::{AutomaticResolver, InteractiveResolver, Resolver};
use movie_tag::title_parser::ReleaseNameParser;
use movie_tag::{BatchProcessor, DirectoryTagger, TagError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Tmdb,
    Imdb,
}

/// Renames movie files and directories to "Title (Year)".
///
/// The first form renames the files and directories given on the command
/// line. The second form (-d) renames all files and directories inside DIR.
#[derive(Parser, Debug)]
#[command(name = "movietag")]
#[command(override_usage = "movietag [OPTIONS] <PATH>...\n       movietag [OPTIONS] -d <DIR>")]
struct Args {
    /// Verbose output (for debugging)
    #[arg(short = 'v')]
    verbose: bool,

    /// Always ask for confirmation before moving loose movie files
    #[arg(short = 'i')]
    ask: bool,

    /// Force mode: ignore existing .name and .imdb files
    #[arg(short = 'f')]
    force: bool,

    /// Clear mode: remove all tagging information (.imdb, .rating, .name, .ignore)
    #[arg(short = 'c')]
    clear: bool,

    /// Offline mode: run without user interaction and show a summary at the end
    #[arg(short = 'o')]
    offline: bool,

    /// Recovery mode: restore previously renamed directories and tag them again
    #[arg(short = 'r', conflicts_with = "offline")]
    recovery: bool,

    /// Process all entries of DIR
    #[arg(short = 'd', value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Quiet mode: no progress information
    #[arg(short = 'q')]
    quiet: bool,

    /// Print a summary at the end of the processing
    #[arg(short = 's')]
    summary: bool,

    /// Add " (TV Series)" to directory names of series
    #[arg(short = 't')]
    tv_label: bool,

    /// Mode for created files, in octal (e.g. 664)
    #[arg(short = 'F', value_name = "PERM", value_parser = parse_permission)]
    file_mode: Option<u32>,

    /// Mode for created directories, in octal (e.g. 775)
    #[arg(short = 'D', value_name = "PERM", value_parser = parse_permission)]
    dir_mode: Option<u32>,

    /// Metadata backend
    #[arg(long, value_enum, default_value_t = Backend::Tmdb, env = "MOVIETAG_BACKEND")]
    backend: Backend,

    /// TMDb API key or read access token
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_key: Option<String>,

    /// Files or directories to rename
    #[arg(value_name = "PATH", required_unless_present = "directory")]
    paths: Vec<PathBuf>,
}

fn parse_permission(literal: &str) -> std::result::Result<u32, String> {
    parse_mode(literal).map_err(|e| e.to_string())
}

impl Args {
    fn to_config(&self) -> movie_tag::Result<TagConfig> {
        ConfigBuilder::new()
            .ask(self.ask)
            .clear(self.clear)
            .force(self.force)
            .offline(self.offline)
            .recovery(self.recovery)
            .quiet(self.quiet)
            .summary(self.summary)
            .tv_label(self.tv_label)
            .file_mode(self.file_mode)
            .dir_mode(self.dir_mode)
            .build()
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,movie_tag={0},movietag={0}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}

/// Builds the metadata backend. A missing TMDb credential is a
/// configuration error unless the run only clears sidecar files.
fn make_lookup(args: &Args, config: &TagConfig) -> movie_tag::Result<Box<dyn MovieLookupService>> {
    match args.backend {
        Backend::Tmdb => {
            let service = TmdbService::new(args.tmdb_key.clone().unwrap_or_default())?;
            if !service.has_credential() && !config.clear {
                return Err(TagError::Config(
                    "no TMDb credential; set TMDB_API_KEY or pass --tmdb-key".to_string(),
                ));
            }
            Ok(Box::new(service))
        }
        Backend::Imdb => Ok(Box::new(ImdbService::new()?)),
    }
}

/// Splits a command-line path into its parent directory and entry name.
fn split_target(path: &Path) -> Option<(PathBuf, String)> {
    let name = path.file_name()?.to_str()?.to_string();
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    Some((root, name))
}

fn run(args: &Args, config: TagConfig, lookup: Box<dyn MovieLookupService>) -> Result<()> {
    let resolver: Box<dyn Resolver> = if config.offline {
        Box::new(AutomaticResolver::new(config.tv_label))
    } else {
        Box::new(InteractiveResolver::new(
            io::stdin().lock(),
            io::stdout(),
            config.tv_label,
        ))
    };

    if config.recovery {
        print!("{}", banner("Recovery Mode", 0));
    }

    let tagger = DirectoryTagger::new(
        config.clone(),
        lookup,
        Box::new(ReleaseNameParser::new()),
        resolver,
    );
    let mut batch = BatchProcessor::new(tagger);

    if let Some(dir) = &args.directory {
        debug!("Directory mode for directory \"{}\".", dir.display());
        batch.process_directory(dir);
    } else {
        for path in &args.paths {
            match split_target(path) {
                Some((root, name)) => batch.process(&root, &name),
                None => error!("Cannot process \"{}\".", path.display()),
            }
        }
    }

    if config.wants_summary() {
        batch
            .notifications()
            .flush(config.quiet, &mut io::stdout().lock())
            .context("Failed to print the summary")?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let setup = args
        .to_config()
        .and_then(|config| make_lookup(&args, &config).map(|lookup| (config, lookup)));
    let (config, lookup) = match setup {
        Ok(setup) => setup,
        Err(e @ TagError::Config(_)) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Running with {:?}", config);

    match run(&args, config, lookup) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
