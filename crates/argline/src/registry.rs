//! Owning store for defined flags and positionals.
//!
//! Flags live in an insertion-ordered map keyed by `short + long`. The long
//! and short name indexes hold [`FlagId`]s into that map, never references,
//! and only `define_flag` touches them, so they cannot dangle.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::arg::Arg;
use crate::classify::flag_name;
use crate::flag::Flag;

/// Hook stored with a flag definition, run by an explicit dispatch pass.
pub type Callback = Box<dyn FnMut(&Flag)>;

/// Stable index of a flag in the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FlagId(usize);

impl FlagId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a positional in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArgId(usize);

impl ArgId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Default)]
pub struct Registry {
    flags: IndexMap<String, Flag>,
    long: HashMap<String, FlagId>,
    short: HashMap<String, FlagId>,
    positionals: Vec<Arg>,
    callbacks: HashMap<FlagId, Callback>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("flags", &self.flags)
            .field("positionals", &self.positionals)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `flag`, replacing any entry under the same `short + long` key.
    ///
    /// Returns `None` for invalid flags. A redefinition keeps the old slot
    /// (and its [`FlagId`]) and drops any callback attached to it.
    pub fn define_flag(&mut self, flag: Flag) -> Option<FlagId> {
        if !flag.is_valid() {
            tracing::warn!(
                long = flag.long_name(),
                short = flag.short_name(),
                "rejected invalid flag definition"
            );
            return None;
        }

        let key = flag.key();
        let (index, previous) = self.flags.insert_full(key, flag);
        let id = FlagId(index);
        if previous.is_some() {
            tracing::debug!(flag = self.flags[index].display_name(), "flag redefined");
        }
        self.callbacks.remove(&id);

        let flag = &self.flags[index];
        if !flag.long_name().is_empty() {
            self.long.insert(flag.long_name().to_string(), id);
        }
        if !flag.short_name().is_empty() {
            self.short.insert(flag.short_name().to_string(), id);
        }
        Some(id)
    }

    pub fn define_flag_with_callback(&mut self, flag: Flag, callback: Callback) -> Option<FlagId> {
        let id = self.define_flag(flag)?;
        self.callbacks.insert(id, callback);
        Some(id)
    }

    /// Append `arg` after the declared slots.
    ///
    /// Positionals synthesized by an earlier parse are dropped first, so
    /// declared slots always precede synthesized ones.
    pub fn define_positional(&mut self, arg: Arg) -> ArgId {
        self.positionals.retain(Arg::is_user_defined);
        self.positionals.push(arg);
        ArgId(self.positionals.len() - 1)
    }

    /// Append a positional made up for a surplus token.
    pub(crate) fn push_synthesized(&mut self, text: &str) -> ArgId {
        self.positionals.push(Arg::synthesized(text));
        ArgId(self.positionals.len() - 1)
    }

    /// Resolve `token` to a flag, registering a bare flag if none answers to it.
    ///
    /// Returns `None` only for tokens that do not name a valid flag
    /// (positionals such as `--`, or `--=x`).
    pub fn lookup_flag(&mut self, token: &str) -> Option<FlagId> {
        let name = flag_name(token)?;
        if let Some(id) = self.find(name) {
            return Some(id);
        }
        tracing::debug!(flag = name, "registering undeclared flag");
        self.define_flag(Flag::undeclared(name))
    }

    /// Like [`Registry::lookup_flag`] without registering anything.
    pub fn find_flag(&self, token: &str) -> Option<FlagId> {
        flag_name(token).and_then(|name| self.find(name))
    }

    pub fn is_defined_flag(&self, token: &str) -> bool {
        self.find_flag(token).is_some()
    }

    /// Whether `token` names a flag the current parse should treat as known:
    /// one the caller defined, or one already set during this parse.
    ///
    /// Flags left over from earlier parses or lookups do not count.
    pub fn is_active_flag(&self, token: &str) -> bool {
        self.find_flag(token).is_some_and(|id| {
            let flag = self.flag(id);
            flag.is_user_defined() || flag.is_set()
        })
    }

    fn find(&self, name: &str) -> Option<FlagId> {
        let index = if name.starts_with("--") {
            &self.long
        } else {
            &self.short
        };
        index.get(name).copied()
    }

    pub fn flag(&self, id: FlagId) -> &Flag {
        &self.flags[id.0]
    }

    pub(crate) fn flag_mut(&mut self, id: FlagId) -> &mut Flag {
        &mut self.flags[id.0]
    }

    /// Flags in definition order.
    pub fn flags(&self) -> impl Iterator<Item = (FlagId, &Flag)> {
        self.flags
            .values()
            .enumerate()
            .map(|(index, flag)| (FlagId(index), flag))
    }

    pub fn flag_count(&self) -> usize {
        self.flags.len()
    }

    pub fn arg(&self, id: ArgId) -> &Arg {
        &self.positionals[id.0]
    }

    /// Positionals in declaration order, synthesized ones last.
    pub fn args(&self) -> impl DoubleEndedIterator<Item = (ArgId, &Arg)> {
        self.positionals
            .iter()
            .enumerate()
            .map(|(index, arg)| (ArgId(index), arg))
    }

    pub fn positionals(&self) -> &[Arg] {
        &self.positionals
    }

    pub(crate) fn positional_mut(&mut self, index: usize) -> Option<&mut Arg> {
        self.positionals.get_mut(index)
    }

    pub fn has_callback(&self, id: FlagId) -> bool {
        self.callbacks.contains_key(&id)
    }

    /// Run the callback of every set flag once, in definition order.
    pub fn dispatch_callbacks(&mut self) -> usize {
        let mut fired = 0;
        for (index, flag) in self.flags.values().enumerate() {
            if !flag.is_set() {
                continue;
            }
            if let Some(callback) = self.callbacks.get_mut(&FlagId(index)) {
                callback(flag);
                fired += 1;
            }
        }
        fired
    }

    /// Forget everything the previous parse bound.
    ///
    /// Flags and declared positionals go back to their unset state and
    /// synthesized positionals are dropped. Auto-registered flags stay.
    pub(crate) fn reset(&mut self) {
        self.flags.values_mut().for_each(Flag::reset);
        self.positionals.retain(Arg::is_user_defined);
        for arg in &mut self.positionals {
            arg.value_mut().reset();
        }
    }
}
