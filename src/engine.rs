//! Suggestion engine for suggest_core
//!
//! Owns the published corpora and answers keystroke queries. Each corpus is
//! an immutable snapshot behind an `Arc`; a refresh builds a new snapshot and
//! swaps the pointer, so a query sees either the old or the new corpus and
//! never a half-built one.

use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::assembler::TrailingSegment;
use crate::config::EngineConfig;
use crate::history::HistorySnippetBuilder;
use crate::template_index::{Corpus, KnownCommands};
use crate::{slog_debug, slog_info};

/// Which corpus a refresh or a completion belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    /// Contextual predictions from the remote predictor
    Predictions,
    /// The full list of known commands
    Commands,
}

impl CorpusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusKind::Predictions => "predictions",
            CorpusKind::Commands => "commands",
        }
    }
}

/// Handed out when a refresh starts; only the newest ticket may publish
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    pub kind: CorpusKind,
    pub generation: u64,
}

/// A completed input line
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Full replacement for the input line
    pub line: String,
    /// Index of the template that produced it
    pub template_index: usize,
    pub source: CorpusKind,
}

/// The command corpus and the known-command set, published together
#[derive(Debug, Default)]
pub struct CommandSet {
    pub corpus: Corpus,
    pub known: KnownCommands,
}

struct Slot<T> {
    current: RwLock<Arc<T>>,
    issued: AtomicU64,
    ready: AtomicBool,
}

impl<T> Slot<T> {
    fn new(initial: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            issued: AtomicU64::new(0),
            ready: AtomicBool::new(false),
        }
    }

    fn snapshot(&self) -> Arc<T> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Swap in `value` if `generation` is still the latest issued
    fn publish(&self, generation: u64, value: T) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.issued.load(Ordering::SeqCst) != generation {
            return false;
        }
        *current = Arc::new(value);
        self.ready.store(true, Ordering::SeqCst);
        true
    }
}

pub struct SuggestionEngine {
    config: EngineConfig,
    snippets: HistorySnippetBuilder,
    predictions: Slot<Corpus>,
    commands: Slot<CommandSet>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SuggestionEngine {
    /// Create an engine with empty corpora
    pub fn new(config: EngineConfig) -> Self {
        let empty = Corpus::build_with_prefix(Vec::<String>::new(), config.flag_prefix);
        Self {
            snippets: HistorySnippetBuilder::from_config(&config),
            predictions: Slot::new(empty.clone()),
            commands: Slot::new(CommandSet {
                corpus: empty,
                known: KnownCommands::default(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a refresh. Any ticket issued earlier for the same kind becomes stale.
    pub fn begin_refresh(&self, kind: CorpusKind) -> RefreshTicket {
        let generation = match kind {
            CorpusKind::Predictions => self.predictions.issue(),
            CorpusKind::Commands => self.commands.issue(),
        };
        RefreshTicket { kind, generation }
    }

    /// Build and publish the corpus for `ticket`.
    ///
    /// Returns false, leaving the current corpus in place, when a newer
    /// refresh of the same kind has been started since.
    pub fn complete_refresh<S: AsRef<str>>(&self, ticket: RefreshTicket, lines: &[S]) -> bool {
        let prefix = self.config.flag_prefix;
        let (published, templates) = match ticket.kind {
            CorpusKind::Predictions => {
                let corpus = Corpus::build_with_prefix(lines, prefix);
                let templates = corpus.len();
                (self.predictions.publish(ticket.generation, corpus), templates)
            }
            CorpusKind::Commands => {
                let set = CommandSet {
                    corpus: Corpus::build_with_prefix(lines, prefix),
                    known: KnownCommands::from_lines(lines),
                };
                let templates = set.corpus.len();
                (self.commands.publish(ticket.generation, set), templates)
            }
        };

        let data = json!({
            "kind": ticket.kind.as_str(),
            "generation": ticket.generation,
            "lines": lines.len(),
            "templates": templates,
        });
        if published {
            slog_debug!("ENGINE", "corpus_published", data);
        } else {
            slog_info!("ENGINE", "stale_refresh_dropped", data);
        }
        published
    }

    /// Replace the prediction corpus
    pub fn refresh_corpus<S: AsRef<str>>(&self, lines: &[S]) -> bool {
        let ticket = self.begin_refresh(CorpusKind::Predictions);
        self.complete_refresh(ticket, lines)
    }

    /// Replace the command corpus and the known-command set
    pub fn refresh_known_commands<S: AsRef<str>>(&self, names: &[S]) -> bool {
        let ticket = self.begin_refresh(CorpusKind::Commands);
        self.complete_refresh(ticket, names)
    }

    /// Whether a refresh of `kind` has ever been published
    pub fn is_ready(&self, kind: CorpusKind) -> bool {
        match kind {
            CorpusKind::Predictions => self.predictions.ready.load(Ordering::SeqCst),
            CorpusKind::Commands => self.commands.ready.load(Ordering::SeqCst),
        }
    }

    pub fn prediction_corpus(&self) -> Arc<Corpus> {
        self.predictions.snapshot()
    }

    pub fn command_set(&self) -> Arc<CommandSet> {
        self.commands.snapshot()
    }

    pub fn is_known_command(&self, command: &str) -> bool {
        self.commands.snapshot().known.contains(command)
    }

    /// Complete a raw input line, or `None` when there is nothing to add
    pub fn query(&self, line: &str) -> Option<String> {
        self.query_detailed(line).map(|completion| completion.line)
    }

    /// Like `query`, also reporting which template and corpus matched.
    ///
    /// The prediction corpus is tried first, then the command corpus.
    pub fn query_detailed(&self, line: &str) -> Option<Completion> {
        let segment = TrailingSegment::parse(line);
        if segment.is_blank() {
            return None;
        }

        let predictions = self.predictions.snapshot();
        let commands = self.commands.snapshot();

        let (result, source) = predictions
            .query(segment.text)
            .map(|m| (m, CorpusKind::Predictions))
            .or_else(|| {
                commands
                    .corpus
                    .query(segment.text)
                    .map(|m| (m, CorpusKind::Commands))
            })?;

        Some(Completion {
            line: segment.rejoin(&result.suggestion),
            template_index: result.template_index,
            source,
        })
    }

    /// Redacted context snippet over the last `window_size` history entries
    pub fn build_context_snippet<S: AsRef<str>>(&self, history: &[S], window_size: usize) -> String {
        let known = self.commands.snapshot();
        HistorySnippetBuilder::from_config(&self.config)
            .with_window(window_size)
            .build(history, &known.known)
    }

    /// Context snippet using the configured window size
    pub fn context_snippet<S: AsRef<str>>(&self, history: &[S]) -> String {
        let known = self.commands.snapshot();
        self.snippets.build(history, &known.known)
    }

    /// Redacted canonical form of one line
    pub fn normalize_line(&self, line: &str) -> String {
        self.snippets.normalize_line(line)
    }
}
