//! Bag Matcher for suggest_core
//!
//! Picks the first template whose command extends the typed command, then
//! the first of its bags that can satisfy every typed parameter, and
//! synthesizes the completed line from it.

use serde::Serialize;

use crate::template_index::{Corpus, Template};
use crate::tokenizer::{split_line_with_prefix, starts_with_ignore_case, ParameterBag};

/// A synthesized completion and the template that produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub suggestion: String,
    pub template_index: usize,
}

impl Corpus {
    /// Complete a single (already whitespace-trimmed at the front) segment.
    ///
    /// Returns `None` when no template or bag fits, when the completed line
    /// would not be longer than `input`, or when it does not start with
    /// `input` (ignoring case). The last rule rejects inputs whose spacing or
    /// abbreviated flags the rebuilt line would rewrite.
    pub fn query(&self, input: &str) -> Option<MatchResult> {
        let typed = split_line_with_prefix(input, self.flag_prefix);
        if typed.is_empty() {
            return None;
        }

        let command_finished = !typed.bag.is_empty() || input.ends_with(char::is_whitespace);
        let template_index = self.select_template(&typed.command, command_finished)?;
        let template = &self.templates()[template_index];

        let suggestion = complete_from_template(template, &typed.bag)?;
        if suggestion.chars().count() <= input.chars().count()
            || !starts_with_ignore_case(&suggestion, input)
        {
            return None;
        }

        Some(MatchResult {
            suggestion,
            template_index,
        })
    }

    /// Index of the first template whose command, plus a trailing separator,
    /// starts with the typed command. Once the command is finished the typed
    /// command must also end at a separator.
    fn select_template(&self, command: &str, command_finished: bool) -> Option<usize> {
        let mut needle = command.to_lowercase();
        if command_finished {
            needle.push(' ');
        }

        self.templates()
            .iter()
            .position(|template| template.search_key.starts_with(&needle))
    }
}

/// First-fit over the template's bags
fn complete_from_template(template: &Template, typed: &ParameterBag) -> Option<String> {
    template
        .bags
        .iter()
        .find_map(|candidate| complete_bag(&template.command, candidate, typed))
}

/// Try to satisfy every typed parameter with a distinct candidate position.
///
/// A claimed position is used both as the flag match and as the value
/// source, so one bitmap tracks both exclusions.
fn complete_bag(command: &str, candidate: &ParameterBag, typed: &ParameterBag) -> Option<String> {
    let mut claimed = vec![false; candidate.len()];
    let mut line = String::from(command);

    for wanted in typed {
        let position = candidate.iter().zip(&claimed).position(|(recorded, used)| {
            !used && starts_with_ignore_case(&recorded.flag, &wanted.flag)
        })?;
        claimed[position] = true;

        let recorded = candidate.get(position)?;
        let value = wanted.value.as_deref().or(recorded.value.as_deref());
        push_parameter(&mut line, &recorded.flag, value);
    }

    for (recorded, _) in candidate.iter().zip(&claimed).filter(|(_, used)| !**used) {
        push_parameter(&mut line, &recorded.flag, recorded.value.as_deref());
    }

    Some(line)
}

fn push_parameter(line: &mut String, flag: &str, value: Option<&str>) {
    line.push(' ');
    line.push_str(flag);
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        line.push(' ');
        line.push_str(value);
    }
}
