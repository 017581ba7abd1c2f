//! Template Index for suggest_core
//!
//! Groups tokenized command lines by command name. Each command keeps every
//! observed parameter bag in arrival order, without deduplication.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::{split_line_with_prefix, ParameterBag, FLAG_PREFIX};

/// All observed parameter bags for one command name
#[derive(Clone, Debug, Serialize)]
pub struct Template {
    /// Command name as first seen
    pub command: String,
    /// Parameter bags in arrival order
    pub bags: Vec<ParameterBag>,
    /// Lowercased command followed by a separator, used for prefix probing
    #[serde(skip)]
    pub(crate) search_key: String,
}

impl Template {
    fn new(command: String, bag: ParameterBag) -> Self {
        let search_key = format!("{} ", command.to_lowercase());
        Self {
            command,
            bags: vec![bag],
            search_key,
        }
    }
}

/// Command name -> Template mapping built from one corpus refresh.
///
/// A corpus is immutable once built; refreshing means building a new one.
#[derive(Clone, Debug, Serialize)]
pub struct Corpus {
    templates: Vec<Template>,
    #[serde(skip)]
    by_command: HashMap<String, usize>,
    #[serde(skip)]
    pub(crate) flag_prefix: char,
}

impl Default for Corpus {
    fn default() -> Self {
        Self::empty()
    }
}

impl Corpus {
    /// A corpus with no templates; every query against it is "no match"
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
            by_command: HashMap::new(),
            flag_prefix: FLAG_PREFIX,
        }
    }

    /// Build a corpus from raw command lines using the default flag prefix
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_prefix(lines, FLAG_PREFIX)
    }

    /// Build a corpus from raw command lines.
    ///
    /// Blank lines are skipped. Command names are grouped case-insensitively.
    pub fn build_with_prefix<I, S>(lines: I, flag_prefix: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self {
            flag_prefix,
            ..Self::empty()
        };

        for line in lines {
            let tokenized = split_line_with_prefix(line.as_ref(), flag_prefix);
            if tokenized.is_empty() {
                continue;
            }

            let key = tokenized.command.to_lowercase();
            match corpus.by_command.get(&key) {
                Some(&index) => corpus.templates[index].bags.push(tokenized.bag),
                None => {
                    corpus.by_command.insert(key, corpus.templates.len());
                    corpus
                        .templates
                        .push(Template::new(tokenized.command, tokenized.bag));
                }
            }
        }

        corpus
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    /// Find the template for an exact command name, ignoring case
    pub fn find(&self, command: &str) -> Option<&Template> {
        self.by_command
            .get(&command.to_lowercase())
            .map(|&index| &self.templates[index])
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Case-insensitive set of command names the predictor knows about
#[derive(Clone, Debug, Default)]
pub struct KnownCommands {
    names: HashSet<String>,
}

impl KnownCommands {
    /// Collect the first whitespace token of every entry, lowercased
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = lines
            .into_iter()
            .filter_map(|line| {
                line.as_ref()
                    .split_whitespace()
                    .next()
                    .map(str::to_lowercase)
            })
            .collect();
        Self { names }
    }

    pub fn contains(&self, command: &str) -> bool {
        !command.is_empty() && self.names.contains(&command.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
