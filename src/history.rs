//! History Snippet Builder for suggest_core
//!
//! Turns the most recent history entries into a fixed-length, redacted
//! context: parameter values are masked, noise flags dropped, and flags
//! sorted so the same invocation always normalizes to the same text.

use crate::config::EngineConfig;
use crate::template_index::KnownCommands;

pub struct HistorySnippetBuilder {
    window: usize,
    sentinel: String,
    redaction_marker: String,
    flag_prefix: char,
    /// Lowercased for case-insensitive comparison
    noise_flags: Vec<String>,
}

impl Default for HistorySnippetBuilder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl HistorySnippetBuilder {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            window: config.history_window,
            sentinel: config.sentinel.clone(),
            redaction_marker: config.redaction_marker.clone(),
            flag_prefix: config.flag_prefix,
            noise_flags: config.noise_flags.iter().map(|f| f.to_lowercase()).collect(),
        }
    }

    /// Same settings with a different window size
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn is_noise(&self, flag: &str) -> bool {
        let flag = flag.to_lowercase();
        self.noise_flags.iter().any(|noise| *noise == flag)
    }

    /// Redact and canonicalize one command line.
    ///
    /// Keeps the command name and every non-noise flag; a flag's value is
    /// replaced by the redaction marker. Positional words and the values of
    /// noise flags are dropped. Flags are sorted by name.
    pub fn normalize_line(&self, line: &str) -> String {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return String::new();
        };

        let mut flags: Vec<(&str, bool)> = Vec::new();
        let mut awaiting_value = false;
        for token in tokens {
            if token.starts_with(self.flag_prefix) {
                awaiting_value = !self.is_noise(token);
                if awaiting_value {
                    flags.push((token, false));
                }
            } else if awaiting_value {
                if let Some(last) = flags.last_mut() {
                    last.1 = true;
                }
                awaiting_value = false;
            }
        }

        flags.sort_by_cached_key(|(flag, _)| flag.to_lowercase());

        let mut normalized = command.to_string();
        for (flag, has_value) in flags {
            normalized.push(' ');
            normalized.push_str(flag);
            if has_value {
                normalized.push(' ');
                normalized.push_str(&self.redaction_marker);
            }
        }
        normalized
    }

    /// Window entries, oldest first.
    ///
    /// Missing history is filled with the sentinel. An entry whose command is
    /// not known breaks the chain: it and every entry before it become the
    /// sentinel.
    pub fn entries<S: AsRef<str>>(&self, history: &[S], known: &KnownCommands) -> Vec<String> {
        let recent = &history[history.len().saturating_sub(self.window)..];
        let mut snippet = vec![self.sentinel.clone(); self.window - recent.len()];

        for entry in recent {
            let entry = entry.as_ref();
            let command = entry.split_whitespace().next().unwrap_or_default();
            if known.contains(command) {
                snippet.push(self.normalize_line(entry));
            } else {
                snippet.fill(self.sentinel.clone());
                snippet.push(self.sentinel.clone());
            }
        }

        snippet
    }

    /// Window entries joined by newlines
    pub fn build<S: AsRef<str>>(&self, history: &[S], known: &KnownCommands) -> String {
        self.entries(history, known).join("\n")
    }
}
