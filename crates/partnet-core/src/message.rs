//! Localizable messages
//!
//! Errors surfaced to a presentation layer carry a translation key and its
//! arguments instead of a rendered sentence.

use std::fmt;

/// Translation key plus positional arguments
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalizedMessage {
    pub key: String,
    pub args: Vec<String>,
}

impl LocalizedMessage {
    pub fn new(key: impl Into<String>) -> Self {
        LocalizedMessage {
            key: key.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl fmt::Display for LocalizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(&self.key)
        } else {
            write!(f, "{} [{}]", self.key, self.args.join(", "))
        }
    }
}
