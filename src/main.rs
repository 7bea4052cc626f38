#![forbid(unsafe_code)]
//! fnnote Command Line Interface

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use fnnote::annotate::NoteLocale;
use fnnote::commands::{
    execute_annotate, execute_init, execute_list, exit_code, AnnotateOptions, InitOptions,
    ListOptions, OutputFormat,
};
use fnnote::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "fnnote")]
#[command(about = "Insert placeholder doc blocks above undocumented JavaScript functions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: .fnnote.json if present)
    #[arg(short, long, global = true, env = "FNNOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert notes above undocumented function headers
    Annotate {
        /// File or directory to annotate
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Compute changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Exit with error if any note would be added (CI mode, never writes)
        #[arg(long)]
        check: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: AnnotateFormat,

        /// File extension to process (repeatable, replaces the configured set)
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Extra directory name or glob to skip (repeatable)
        #[arg(long)]
        ignore: Vec<String>,

        /// Descend into hidden directories
        #[arg(long)]
        include_hidden: bool,

        /// Language of the generated note text
        #[arg(long, value_enum)]
        locale: Option<LocaleArg>,

        /// Text shown when a function has no parameters
        #[arg(long)]
        placeholder: Option<String>,

        /// Number of parallel workers (default: number of CPUs)
        #[arg(long, short = 'j')]
        workers: Option<usize>,
    },

    /// List recognized function headers without changing anything
    List {
        /// File or directory to inspect
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Only show headers that have no note
        #[arg(long)]
        missing: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// File extension to inspect (repeatable, replaces the configured set)
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Extra directory name or glob to skip (repeatable)
        #[arg(long)]
        ignore: Vec<String>,

        /// Descend into hidden directories
        #[arg(long)]
        include_hidden: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for annotation results
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum AnnotateFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl From<AnnotateFormat> for OutputFormat {
    fn from(format: AnnotateFormat) -> Self {
        match format {
            AnnotateFormat::Text => OutputFormat::Text,
            AnnotateFormat::Json => OutputFormat::Json,
            AnnotateFormat::Diff => OutputFormat::Diff,
        }
    }
}

/// Note text language
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LocaleArg {
    English,
    Arabic,
}

impl From<LocaleArg> for NoteLocale {
    fn from(locale: LocaleArg) -> Self {
        match locale {
            LocaleArg::English => NoteLocale::English,
            LocaleArg::Arabic => NoteLocale::Arabic,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "fnnote=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    Ok(Config::resolve(path.map(PathBuf::as_path), Path::new("."))?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Annotate {
            path,
            dry_run,
            check,
            format,
            extensions,
            ignore,
            include_hidden,
            locale,
            placeholder,
            workers,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let options = AnnotateOptions {
                path,
                dry_run,
                check,
                format: format.into(),
                extensions,
                ignore,
                include_hidden,
                locale: locale.map(Into::into),
                placeholder,
                workers,
                verbose: cli.verbose,
            };
            let summary = execute_annotate(options, config)?;

            let code = exit_code(&summary, check);
            if check && summary.annotations_added > 0 {
                eprintln!(
                    "\n{} {} function(s) in {} file(s) have no note",
                    style("✗").red(),
                    summary.annotations_added,
                    summary.files_changed
                );
            }
            if code != 0 {
                std::process::exit(code);
            }
        }

        Commands::List {
            path,
            missing,
            json,
            extensions,
            ignore,
            include_hidden,
        } => {
            let config = load_config(cli.config.as_ref())?;
            execute_list(
                ListOptions {
                    path,
                    missing_only: missing,
                    json,
                    extensions,
                    ignore,
                    include_hidden,
                },
                config,
            )?;
        }

        Commands::Init { force } => {
            let output = cli
                .config
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            execute_init(InitOptions { output, force })?;
        }
    }

    Ok(())
}
