//! Syntactic classification of raw argument tokens.
//!
//! Classification never looks at what is defined: `-x` is a short flag
//! whether or not anything answers to it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// `file`, `-`, `--` (and the empty token).
    Positional,
    /// `-x`
    ShortFlag,
    /// `-xyz`
    ShortFlagCluster,
    /// `--name=value`
    LongFlagWithValue,
    /// `--name`
    LongFlagBare,
}

impl ParamKind {
    pub fn is_flag(self) -> bool {
        self != Self::Positional
    }
}

/// Classify a single token. Total over all strings; lengths count characters.
pub fn classify(token: &str) -> ParamKind {
    let mut chars = token.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return ParamKind::Positional;
    };
    if first != '-' {
        return ParamKind::Positional;
    }

    let rest = chars.as_str();
    match (second, rest.is_empty()) {
        ('-', true) => ParamKind::Positional,
        (_, true) => ParamKind::ShortFlag,
        ('-', false) if rest.contains('=') => ParamKind::LongFlagWithValue,
        ('-', false) => ParamKind::LongFlagBare,
        (_, false) => ParamKind::ShortFlagCluster,
    }
}

/// The flag name a token resolves to.
///
/// Clusters resolve to their leading short flag (`-xyz` => `-x`) and inline
/// values are cut off at the first `=` (`--out=a.txt` => `--out`).
pub fn flag_name(token: &str) -> Option<&str> {
    match classify(token) {
        ParamKind::Positional => None,
        ParamKind::ShortFlag | ParamKind::LongFlagBare => Some(token),
        ParamKind::ShortFlagCluster => token
            .char_indices()
            .nth(2)
            .map(|(idx, _)| &token[..idx]),
        ParamKind::LongFlagWithValue => token.split_once('=').map(|(name, _)| name),
    }
}
