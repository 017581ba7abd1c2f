/*!
 * Suggest CLI - command line completion from observed invocations
 *
 * Loads a corpus of command lines from a file and completes a partially
 * typed line, or builds the redacted history snippet sent to the predictor.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use suggest_core::structured_log::{init_logger, LogConfig, LogLevel};
use suggest_core::{slog_error, EngineConfig, SuggestionEngine};

#[derive(Parser)]
#[command(name = "suggest_cli")]
#[command(about = "Suggest - command line completion from observed invocations", long_about = None)]
struct Cli {
    /// Engine configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Minimum log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Also append log lines to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete a partially typed line
    Query {
        /// Prediction corpus, one command line per line
        #[arg(long)]
        corpus: PathBuf,

        /// Known commands, used as a fallback corpus
        #[arg(long)]
        commands: Option<PathBuf>,

        /// Emit a JSON object instead of the bare line
        #[arg(short, long)]
        json: bool,

        /// The typed line
        line: String,
    },

    /// Print the templates built from a corpus as JSON
    Index {
        #[arg(long)]
        corpus: PathBuf,
    },

    /// Build the redacted history snippet
    Snippet {
        /// History, oldest first
        #[arg(long)]
        history: PathBuf,

        /// Known commands
        #[arg(long)]
        commands: PathBuf,

        /// Window size (defaults to the configured one)
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Print the redacted canonical form of a line
    Normalize {
        line: String,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    init_logger(LogConfig {
        json_output: true,
        file_path: cli.log_file.clone(),
        min_level: cli.log_level,
    });

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            slog_error!("CLI", "command_failed", &format!("{:#}", e), json!({ "exit_code": 2 }));
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = SuggestionEngine::new(config);

    match cli.command {
        Commands::Query { corpus, commands, json, line } => {
            engine.refresh_corpus(&read_lines(&corpus)?);
            if let Some(path) = commands {
                engine.refresh_known_commands(&read_lines(&path)?);
            }

            let Some(completion) = engine.query_detailed(&line) else {
                return Ok(1);
            };
            if json {
                println!("{}", serde_json::to_string(&completion)?);
            } else {
                println!("{}", completion.line);
            }
        }
        Commands::Index { corpus } => {
            engine.refresh_corpus(&read_lines(&corpus)?);
            let corpus = engine.prediction_corpus();
            println!("{}", serde_json::to_string_pretty(corpus.templates())?);
        }
        Commands::Snippet { history, commands, window } => {
            engine.refresh_known_commands(&read_lines(&commands)?);
            let history = read_lines(&history)?;
            let window = window.unwrap_or(engine.config().history_window);
            if window == 0 {
                anyhow::bail!("window must be at least 1");
            }
            println!("{}", engine.build_context_snippet(&history, window));
        }
        Commands::Normalize { line } => {
            println!("{}", engine.normalize_line(&line));
        }
        Commands::Version => {
            println!("suggest_cli v{}", env!("CARGO_PKG_VERSION"));
            println!("Suggest - command line completion engine");
        }
    }

    Ok(0)
}

/// Non-blank lines of a text file
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
