use anyhow::Result;
use clap::Parser;
use refrain_etl::config::LoggingConfig;
use refrain_etl::{Config, ScorerKind};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "refrain", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Enrich streaming history with lyrics sentiment
    ///
    /// Loads every user's streaming-history exports from the data directory
    /// (one sub-directory per user), writes the combined plays, then looks
    /// up lyrics for each play on Genius and scores them.
    ///
    /// Each (artist, title) pair is looked up at most once per run. Plays
    /// whose lyrics cannot be found, or whose lookup fails, are kept with a
    /// null score.
    ///
    /// Output (in the output directory):
    /// - combined_streaming_data.json
    /// - combined_streaming_with_sentiment.json
    Enrich {
        /// Directory with one streaming-history sub-directory per user
        data_dir: Option<PathBuf>,

        /// Directory the exports are written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sentiment strategy (lexicon or classifier)
        #[arg(long)]
        scorer: Option<ScorerKind>,
    },
    /// Print listening-by-hour and top artists
    ///
    /// When an enriched export exists in the output directory, sentiment per
    /// user is printed as well.
    Report {
        /// Directory with one streaming-history sub-directory per user
        data_dir: Option<PathBuf>,

        /// Number of artists to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Directory holding a previous enrich run's exports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score a lyric text with the configured strategy
    Score {
        /// Text to score (read from stdin when omitted)
        text: Option<String>,

        /// Sentiment strategy (lexicon or classifier)
        #[arg(long)]
        scorer: Option<ScorerKind>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

fn log_level(name: &str) -> twyg::LogLevel {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => twyg::LogLevel::Trace,
        "debug" => twyg::LogLevel::Debug,
        "warn" | "warning" => twyg::LogLevel::Warn,
        "error" => twyg::LogLevel::Error,
        _ => twyg::LogLevel::Info,
    }
}

fn setup_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        twyg::LogLevel::Debug
    } else {
        log_level(&logging.level)
    };

    let opts = twyg::OptsBuilder::new()
        .coloured(logging.coloured)
        .level(level)
        .report_caller(verbose)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logging options: {e:?}"))?;
    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Failed to set up logging: {e:?}"))?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    setup_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Enrich {
            data_dir,
            output,
            scorer,
        } => {
            apply_overrides(&mut config, data_dir, output, scorer);
            commands::run_enrich(&config)?;
        }
        Commands::Report {
            data_dir,
            top,
            output,
        } => {
            apply_overrides(&mut config, data_dir, output, None);
            commands::show_report(&config, top)?;
        }
        Commands::Score { text, scorer } => {
            apply_overrides(&mut config, None, None, scorer);
            commands::run_score(&config, text)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

/// CLI flags take priority over the environment and the config file.
fn apply_overrides(
    config: &mut Config,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    scorer: Option<ScorerKind>,
) {
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(scorer) = scorer {
        config.scorer = scorer;
    }
}
