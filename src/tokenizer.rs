//! Command line tokenizer for suggest_core
//!
//! Splits a raw command line into a command name and an ordered bag of
//! flag/value pairs. Tokenization never fails: malformed input degrades to
//! the best decomposition available.

use serde::{Deserialize, Serialize};

/// Character that marks a token as a flag
pub const FLAG_PREFIX: char = '-';

/// A single flag with its optional value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Flag name including its prefix (e.g. "-Name")
    pub flag: String,
    /// Value following the flag, `None` for switches
    pub value: Option<String>,
}

impl Parameter {
    pub fn new(flag: impl Into<String>, value: Option<String>) -> Self {
        Self {
            flag: flag.into(),
            value,
        }
    }

    /// Whether this parameter carries no value
    pub fn is_switch(&self) -> bool {
        self.value.is_none()
    }
}

/// Ordered flag/value pairs taken from one command invocation.
///
/// Pairs keep the order their flags first appeared in; repeated flags are
/// kept as separate pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag {
    parameters: Vec<Parameter>,
}

impl ParameterBag {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }
}

impl<'a> IntoIterator for &'a ParameterBag {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// A command line split into its command name and parameters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TokenizedLine {
    pub command: String,
    pub bag: ParameterBag,
}

impl TokenizedLine {
    /// True for blank input, which callers treat as "nothing to match"
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

/// Split a line using the default `-` flag prefix
pub fn split_line(line: &str) -> TokenizedLine {
    split_line_with_prefix(line, FLAG_PREFIX)
}

/// Split a line into a command name and a parameter bag.
///
/// The first token is the command name. Non-flag tokens before the first
/// flag are joined onto the command name (`git commit`), a non-flag token
/// right after a flag becomes its value, and further non-flag tokens are
/// joined onto that value.
pub fn split_line_with_prefix(line: &str, flag_prefix: char) -> TokenizedLine {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return TokenizedLine::default();
    };

    let mut command = first.to_string();
    let mut parameters: Vec<Parameter> = Vec::new();

    for token in tokens {
        if token.starts_with(flag_prefix) {
            parameters.push(Parameter::new(token, None));
            continue;
        }

        match parameters.last_mut() {
            None => {
                command.push(' ');
                command.push_str(token);
            }
            Some(last) => match last.value.as_mut() {
                Some(value) => {
                    value.push(' ');
                    value.push_str(token);
                }
                None => last.value = Some(token.to_string()),
            },
        }
    }

    TokenizedLine {
        command,
        bag: ParameterBag::new(parameters),
    }
}

/// Case-insensitive `starts_with` that does not allocate
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text_chars = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|c| text_chars.next() == Some(c))
}
