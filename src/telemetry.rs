//! Telemetry values for suggest_core
//!
//! The engine only computes records; delivering them is up to a
//! `TelemetrySink`. Per-session counters belong to the caller and are
//! passed in by reference.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::SuggestionEngine;
use crate::structured_log::{log_event, LogLevel};

/// What the user accepted part of
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptedPart {
    /// Text that came from a predicted suggestion
    Suggestion,
    /// Text that came from anywhere else, typically history
    History,
}

/// Keystroke and acceptance counts since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub keystrokes: u32,
    pub suggestion_parts_accepted: u32,
    pub history_parts_accepted: u32,
}

impl SessionCounters {
    pub fn record_keystroke(&mut self) {
        self.keystrokes += 1;
    }

    pub fn record_accepted(&mut self, part: AcceptedPart) {
        match part {
            AcceptedPart::Suggestion => self.suggestion_parts_accepted += 1,
            AcceptedPart::History => self.history_parts_accepted += 1,
        }
    }

    /// Called on each submission / new prediction request
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One "submission" record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    /// The submitted line, redacted
    pub line: String,
    pub keystrokes: u32,
    pub num_history_accepted: u32,
    pub num_suggestions_part_accepted: u32,
    pub line_length: usize,
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    /// Prediction template that matches the line, -1 for none
    pub suggestion_index: i64,
    /// Redacted history snippet preceding the submission
    pub related_history: String,
}

/// Receiver of telemetry records
pub trait TelemetrySink {
    fn track(&self, event: &str, record: &SubmissionRecord);
}

/// Writes records to the structured log
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn track(&self, event: &str, record: &SubmissionRecord) {
        let data = serde_json::to_value(record).unwrap_or_default();
        log_event(LogLevel::Info, "TELEMETRY", event, data);
    }
}

impl SuggestionEngine {
    /// Classify an accepted piece of text by whether the predictions know it
    pub fn classify_accepted_part(&self, part: &str) -> AcceptedPart {
        match self.prediction_corpus().query(part.trim_start()) {
            Some(_) => AcceptedPart::Suggestion,
            None => AcceptedPart::History,
        }
    }

    /// Build the record for a submitted line.
    ///
    /// `None` when the line's command is not a known command.
    pub fn submission_record<S: AsRef<str>>(
        &self,
        line: &str,
        counters: &SessionCounters,
        session_id: Uuid,
        history: &[S],
    ) -> Option<SubmissionRecord> {
        let text = line.trim();
        let command = text.split_whitespace().next()?;
        if !self.is_known_command(command) {
            return None;
        }

        let suggestion_index = self
            .prediction_corpus()
            .query(text)
            .map(|m| m.template_index as i64)
            .unwrap_or(-1);

        Some(SubmissionRecord {
            line: self.normalize_line(text),
            keystrokes: counters.keystrokes,
            num_history_accepted: counters.history_parts_accepted,
            num_suggestions_part_accepted: counters.suggestion_parts_accepted,
            line_length: line.chars().count(),
            session_id,
            suggestion_index,
            related_history: self.context_snippet(history),
        })
    }
}
