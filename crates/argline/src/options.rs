//! Parser configuration read from `key=value` strings.
//!
//! ```
//! use argline::{HelpShow, Options};
//!
//! let options = Options::parse("program.name=demo,tab=  ,help.show=2,help.add=false").unwrap();
//! assert_eq!(options.program_name, "demo");
//! assert_eq!(options.tab, "  ");
//! assert_eq!(options.help.show, HelpShow::ShowAll);
//! assert!(!options.help.add);
//! ```

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("option '{key}' expects a boolean, got '{value}'")]
    InvalidBool { key: String, value: String },
    #[error("option 'help.show' expects 0, 1, 2 or a level name, got '{0}'")]
    InvalidHelpLevel(String),
}

/// Which entries the generated help lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HelpShow {
    /// Only entries that carry a description.
    ShowOnesWithDescription,
    /// Only entries the caller defined.
    #[default]
    ShowAllDefined,
    /// Everything, including auto-registered flags.
    ShowAll,
}

impl FromStr for HelpShow {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "described" => Ok(Self::ShowOnesWithDescription),
            "1" | "defined" => Ok(Self::ShowAllDefined),
            "2" | "all" => Ok(Self::ShowAll),
            other => Err(OptionsError::InvalidHelpLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HelpOptions {
    /// Define `-h, --help` when the parser is created.
    pub add: bool,
    /// Render entries without blank lines between them.
    pub compact: bool,
    pub show: HelpShow,
}

impl Default for HelpOptions {
    fn default() -> Self {
        Self {
            add: true,
            compact: true,
            show: HelpShow::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Options {
    /// Name used in help; taken from `argv[0]` by the first parse if empty.
    pub program_name: String,
    /// Indentation used by the help formatter.
    pub tab: String,
    /// Stored for callers; parsing ignores it.
    pub strict: bool,
    pub help: HelpOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            program_name: String::new(),
            tab: "    ".to_string(),
            strict: false,
            help: HelpOptions::default(),
        }
    }
}

impl Options {
    /// Parse comma separated pairs, e.g. `program.name=demo,help.show=2`.
    ///
    /// Values are taken verbatim (no trimming), so `tab=  ` is two spaces.
    pub fn parse(interlaced: &str) -> Result<Self, OptionsError> {
        Self::from_pairs(interlaced.split(',').filter(|pair| !pair.is_empty()))
    }

    /// Parse a list of `key=value` pairs; values may contain commas.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) => options.set(key, value)?,
                None => tracing::warn!(entry = pair, "ignoring option without '='"),
            }
        }
        Ok(options)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionsError> {
        match key.trim() {
            "program.name" => self.program_name = value.to_string(),
            "tab" => self.tab = value.to_string(),
            "mode.strict" => self.strict = parse_bool(key, value)?,
            "help.add" => self.help.add = parse_bool(key, value)?,
            "help.compact" => self.help.compact = parse_bool(key, value)?,
            "help.show" => self.help.show = value.parse()?,
            other => tracing::warn!(key = other, "ignoring unknown option"),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OptionsError::InvalidBool {
            key: key.trim().to_string(),
            value: value.to_string(),
        }),
    }
}
