//! suggest_core - command line suggestion engine
//!
//! Completes a partially typed command line from previously observed
//! invocations of the same command.
//!
//! Modules:
//! - tokenizer: Split a line into command name and parameter bag
//! - template_index: Group observed bags per command (Corpus)
//! - matcher: First-fit bag matching and completion synthesis
//! - assembler: Complete only the trailing pipeline/assignment segment
//! - history: Redacted, canonical history snippets
//! - engine: Snapshot-and-swap corpora and keystroke queries
//! - predictor: Remote predictor adapter and background refreshes
//! - telemetry: Session counters and submission records
//! - config: JSON engine configuration
//! - structured_log: JSON-line logging

pub mod structured_log;
pub mod tokenizer;
pub mod template_index;
pub mod matcher;
pub mod assembler;
pub mod history;
pub mod config;
pub mod engine;
pub mod predictor;
pub mod telemetry;

// Re-export key types for convenience
pub use tokenizer::{split_line, Parameter, ParameterBag, TokenizedLine, FLAG_PREFIX};

pub use template_index::{Corpus, KnownCommands, Template};

pub use matcher::MatchResult;

pub use assembler::TrailingSegment;

pub use history::HistorySnippetBuilder;

pub use config::{ConfigError, EngineConfig};

pub use engine::{CommandSet, Completion, CorpusKind, RefreshTicket, SuggestionEngine};

pub use predictor::{
    HttpPredictorService, PredictionRequest, PredictorError, PredictorService,
    refresh_commands, refresh_commands_then_predictions, refresh_predictions,
    spawn_prediction_refresh,
};

pub use telemetry::{AcceptedPart, LogSink, SessionCounters, SubmissionRecord, TelemetrySink};
