//! The parsing engine.
//!
//! One left-to-right pass over the tokens with a single token of lookahead:
//! a value-bearing flag takes the next token as its value unless that token
//! is itself a defined flag (a required value takes it regardless).

use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

use crate::arg::{Arg, SENTINEL_ARG};
use crate::classify::{ParamKind, classify};
use crate::error::{ErrorCode, ErrorLog, ParseError, Subject};
use crate::flag::{Flag, SENTINEL_FLAG};
use crate::help;
use crate::options::{Options, OptionsError};
use crate::read::{ReadError, read};
use crate::registry::{ArgId, FlagId, Registry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub defined: usize,
    pub undefined: usize,
}

/// How many flag and argument tokens the last parse matched against
/// caller-defined entries versus auto-registered or synthesized ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub flags: Tally,
    pub args: Tally,
}

#[derive(Debug)]
pub struct ArgParser {
    options: Options,
    registry: Registry,
    errors: ErrorLog,
    counts: Counts,
}

impl Default for ArgParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgParser {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let mut parser = Self {
            options,
            registry: Registry::new(),
            errors: ErrorLog::default(),
            counts: Counts::default(),
        };
        if parser.options.help.add {
            parser
                .registry
                .define_flag(Flag::new("--help", "-h").help("Show this help."));
        }
        parser
    }

    /// Build a parser from an option string such as `program.name=demo,help.add=0`.
    pub fn from_option_str(options: &str) -> Result<Self, OptionsError> {
        Ok(Self::with_options(Options::parse(options)?))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn program_name(&self) -> &str {
        &self.options.program_name
    }

    /// Name used in help. A non-empty name is kept by later parses.
    pub fn set_program_name(&mut self, name: impl Into<String>) {
        self.options.program_name = name.into();
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Define a flag. Invalid flags yield [`SENTINEL_FLAG`].
    pub fn def_flag(&mut self, flag: Flag) -> &Flag {
        match self.registry.define_flag(flag) {
            Some(id) => self.registry.flag(id),
            None => &SENTINEL_FLAG,
        }
    }

    /// Define a flag whose callback runs from [`ArgParser::dispatch_callbacks`].
    pub fn def_flag_with_callback<F>(&mut self, flag: Flag, callback: F) -> &Flag
    where
        F: FnMut(&Flag) + 'static,
    {
        match self
            .registry
            .define_flag_with_callback(flag, Box::new(callback))
        {
            Some(id) => self.registry.flag(id),
            None => &SENTINEL_FLAG,
        }
    }

    /// Declare the next positional slot.
    ///
    /// Positionals synthesized by an earlier parse are discarded.
    pub fn def_arg(&mut self, arg: Arg) -> &Arg {
        let id = self.registry.define_positional(arg);
        self.registry.arg(id)
    }

    /// Parse `tokens`, where `tokens[0]` is the program name.
    ///
    /// Returns `true` when no error was recorded. Every call starts from a
    /// clean slate: earlier errors, counts, bindings and synthesized
    /// positionals are discarded. Whatever matched before a failure stays
    /// visible afterwards.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        self.errors.clear();
        let Some((program, rest)) = tokens.split_first() else {
            self.errors
                .push(ErrorCode::ArgVEmpty, "Wrong argument count: 0!", Subject::None);
            return false;
        };

        self.registry.reset();
        self.counts = Counts::default();
        if self.options.program_name.is_empty() {
            self.options.program_name = program.as_ref().to_string();
        }

        let mut required_args = self
            .registry
            .positionals()
            .iter()
            .filter(|a| a.is_required())
            .count();
        let mut arg_count = 0usize;
        let mut i = 0usize;
        while i < rest.len() {
            let token = rest[i].as_ref();
            let next = rest.get(i + 1).map(|s| s.as_ref());
            let kind = classify(token);
            tracing::debug!(token, ?kind, "classified token");

            let consumed_next = match kind {
                ParamKind::Positional => {
                    self.bind_positional(token, arg_count, &mut required_args);
                    arg_count += 1;
                    false
                }
                ParamKind::ShortFlag | ParamKind::LongFlagBare => self.bind_flag(token, None, next),
                ParamKind::LongFlagWithValue => match token.split_once('=') {
                    Some((name, inline)) => self.bind_flag(name, Some(inline), next),
                    None => self.bind_flag(token, None, next),
                },
                ParamKind::ShortFlagCluster => {
                    self.mark_cluster(token);
                    false
                }
            };

            i += if consumed_next { 2 } else { 1 };
        }

        self.check_flag_values();
        if required_args > 0 {
            self.check_required_args();
        }
        self.errors.is_empty()
    }

    fn bind_positional(&mut self, token: &str, cursor: usize, outstanding: &mut usize) {
        match self.registry.positional_mut(cursor) {
            Some(slot) => {
                if slot.is_required() && !slot.is_set() {
                    *outstanding -= 1;
                }
                slot.value_mut().bind(token);
                self.counts.args.defined += 1;
            }
            None => {
                tracing::debug!(token, "synthesizing positional");
                self.registry.push_synthesized(token);
                self.counts.args.undefined += 1;
            }
        }
    }

    /// Returns whether `next` was taken as the flag's value.
    fn bind_flag(&mut self, name: &str, inline: Option<&str>, next: Option<&str>) -> bool {
        let Some(id) = self.registry.lookup_flag(name) else {
            tracing::debug!(token = name, "ignoring token that names no valid flag");
            return false;
        };
        let next_is_flag =
            next.is_some_and(|n| classify(n).is_flag() && self.registry.is_active_flag(n));

        let flag = self.set_flag(id);
        let Some(value) = flag.value_mut() else {
            return false;
        };
        if let Some(text) = inline {
            value.bind(text);
            return false;
        }
        match next {
            Some(text) if value.is_required() || !next_is_flag => {
                value.bind(text);
                true
            }
            _ => false,
        }
    }

    /// `-abc` marks `-a`, `-b` and `-c` as set. Values are never bound here.
    fn mark_cluster(&mut self, token: &str) {
        for c in token.chars().skip(1) {
            let name = format!("-{c}");
            match self.registry.lookup_flag(&name) {
                Some(id) => {
                    self.set_flag(id);
                }
                None => tracing::debug!(flag = %name, "skipping cluster character"),
            }
        }
    }

    fn set_flag(&mut self, id: FlagId) -> &mut Flag {
        let flag = self.registry.flag_mut(id);
        flag.mark_set();
        if flag.is_user_defined() {
            self.counts.flags.defined += 1;
        } else {
            self.counts.flags.undefined += 1;
        }
        flag
    }

    fn check_flag_values(&mut self) {
        let missing: Vec<FlagId> = self
            .registry
            .flags()
            .filter(|(_, f)| {
                f.is_set()
                    && f
                        .value()
                        .is_some_and(|v| v.is_required() && !v.is_set())
            })
            .map(|(id, _)| id)
            .collect();
        for id in missing {
            let message = format!(
                "Required value missing for flag '{}'!",
                self.registry.flag(id).display_name()
            );
            self.errors
                .push(ErrorCode::RequiredFlagValueMissing, message, Subject::Flag(id));
        }
    }

    /// One error per unbound required positional, last slot first.
    fn check_required_args(&mut self) {
        let missing: Vec<(ArgId, String)> = self
            .registry
            .args()
            .rev()
            .filter(|(_, a)| a.is_required() && !a.is_set())
            .map(|(id, a)| (id, a.name().to_string()))
            .collect();
        for (id, name) in missing {
            self.errors.push(
                ErrorCode::RequiredArgumentMissing,
                format!("Required argument missing: <{name}>"),
                Subject::Arg(id),
            );
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        self.errors.as_slice()
    }

    /// All errors as `error: <message>` lines.
    pub fn error(&self) -> String {
        self.errors.render()
    }

    pub fn help(&self) -> String {
        help::render(&self.registry, &self.options)
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    /// Resolve a flag by name, registering it if undefined.
    ///
    /// Non-flag names resolve to [`SENTINEL_FLAG`].
    pub fn flag(&mut self, name: &str) -> &Flag {
        match self.registry.lookup_flag(name) {
            Some(id) => self.registry.flag(id),
            None => &SENTINEL_FLAG,
        }
    }

    /// Resolve a flag by name without registering anything.
    pub fn get_flag(&self, name: &str) -> Option<&Flag> {
        self.registry.find_flag(name).map(|id| self.registry.flag(id))
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.registry.flags().map(|(_, f)| f)
    }

    /// Positional at `index`, or [`SENTINEL_ARG`] when out of range.
    pub fn arg(&self, index: usize) -> &Arg {
        self.registry
            .positionals()
            .get(index)
            .unwrap_or(&SENTINEL_ARG)
    }

    pub fn args(&self) -> &[Arg] {
        self.registry.positionals()
    }

    /// Whether the named flag was set by the last parse.
    pub fn check(&self, name: &str) -> bool {
        self.get_flag(name).is_some_and(Flag::is_set)
    }

    /// The named flag's value as `T`, if the flag is set, carries a value
    /// and the text converts.
    pub fn check_and_read<T>(&self, name: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let flag = self.get_flag(name).filter(|f| f.is_set())?;
        read(flag.value()?).ok()
    }

    pub fn read_arg<T>(&self, index: usize) -> Result<T, ReadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        read(self.arg(index).value())
    }

    /// Run the callbacks of all set flags; returns how many ran.
    pub fn dispatch_callbacks(&mut self) -> usize {
        self.registry.dispatch_callbacks()
    }
}
