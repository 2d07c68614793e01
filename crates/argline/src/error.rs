use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::registry::{ArgId, FlagId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    NoError,
    /// A set flag's required value was never bound.
    RequiredFlagValueMissing,
    /// A required positional was never bound.
    RequiredArgumentMissing,
    /// The token vector was empty.
    ArgVEmpty,
    /// Reserved; the parser never emits it.
    ArgCountExceedsVector,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoError => "NoError",
            Self::RequiredFlagValueMissing => "RequiredFlagValueMissing",
            Self::RequiredArgumentMissing => "RequiredArgumentMissing",
            Self::ArgVEmpty => "ArgVEmpty",
            Self::ArgCountExceedsVector => "ArgCountExceedsVector",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a [`ParseError`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "kebab-case")]
pub enum Subject {
    None,
    Flag(FlagId),
    Arg(ArgId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ParseError {
    code: ErrorCode,
    message: String,
    subject: Subject,
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }
}

/// Append-only log of the errors found by one parse.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ParseError>,
}

impl ErrorLog {
    pub(crate) fn push(&mut self, code: ErrorCode, message: impl Into<String>, subject: Subject) {
        let message = message.into();
        tracing::debug!(%code, %message, "parse error recorded");
        self.entries.push(ParseError {
            code,
            message,
            subject,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn as_slice(&self) -> &[ParseError] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// One `error: <message>` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!("error: {entry}\n"));
        }
        out
    }
}
