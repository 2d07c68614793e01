use serde::Serialize;

use crate::value::Value;

/// The invalid flag returned in place of a failed definition or lookup.
pub static SENTINEL_FLAG: Flag = Flag::sentinel();

/// A switch identified by a short name (`-v`), a long name (`--verbose`) or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Flag {
    #[serde(skip_serializing_if = "String::is_empty")]
    long_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    short_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    is_set: bool,
    user_defined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl Flag {
    pub fn new(long_name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: short_name.into(),
            user_defined: true,
            ..Self::sentinel()
        }
    }

    /// A flag with only a long name.
    pub fn long(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }

    /// A flag with only a short name.
    pub fn short(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    pub const fn sentinel() -> Self {
        Self {
            long_name: String::new(),
            short_name: String::new(),
            description: String::new(),
            is_set: false,
            user_defined: false,
            value: None,
        }
    }

    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a value slot to the flag.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// A bare flag registered on first sight during parsing or lookup.
    pub(crate) fn undeclared(name: &str) -> Self {
        let flag = if name.starts_with("--") {
            Self::long(name)
        } else {
            Self::short(name)
        };
        Self {
            user_defined: false,
            ..flag
        }
    }

    /// Validation rules:
    /// - at least one name is present
    /// - a short name is `-` followed by exactly one character other than `-`
    /// - a long name starts with `--`, has at least one more character and no `=`
    pub fn is_valid(&self) -> bool {
        if self.is_sentinel() {
            return false;
        }
        (self.short_name.is_empty() || is_short_name(&self.short_name))
            && (self.long_name.is_empty() || is_long_name(&self.long_name))
    }

    pub fn is_sentinel(&self) -> bool {
        self.long_name.is_empty() && self.short_name.is_empty()
    }

    /// Owning-store key: the short name followed by the long name.
    pub fn key(&self) -> String {
        format!("{}{}", self.short_name, self.long_name)
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// The long name if there is one, otherwise the short name.
    pub fn display_name(&self) -> &str {
        if self.long_name.is_empty() {
            &self.short_name
        } else {
            &self.long_name
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub fn is_user_defined(&self) -> bool {
        self.user_defined
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut Value> {
        self.value.as_mut()
    }

    pub(crate) fn mark_set(&mut self) {
        self.is_set = true;
    }

    pub(crate) fn reset(&mut self) {
        self.is_set = false;
        if let Some(value) = &mut self.value {
            value.reset();
        }
    }
}

fn is_short_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('-'), Some(c), None) if c != '-'
    )
}

fn is_long_name(name: &str) -> bool {
    name.starts_with("--") && name.len() > 2 && !name.contains('=')
}

#[cfg(test)]
mod tests {
    use super::{Flag, SENTINEL_FLAG};

    #[test]
    fn validates_names() {
        assert!(Flag::new("--verbose", "-v").is_valid());
        assert!(Flag::long("--x").is_valid());
        assert!(Flag::short("-x").is_valid());

        assert!(!SENTINEL_FLAG.is_valid());
        assert!(!Flag::new("", "").is_valid());
        assert!(!Flag::short("-").is_valid());
        assert!(!Flag::short("--").is_valid());
        assert!(!Flag::short("-xy").is_valid());
        assert!(!Flag::short("x").is_valid());
        assert!(!Flag::long("--").is_valid());
        assert!(!Flag::long("-verbose").is_valid());
        assert!(!Flag::long("--out=x").is_valid());
        assert!(!Flag::new("--verbose", "v").is_valid());
    }

    #[test]
    fn key_concatenates_short_then_long() {
        assert_eq!(Flag::new("--name", "-n").key(), "-n--name");
        assert_eq!(Flag::long("--name").key(), "--name");
        assert_eq!(Flag::short("-n").key(), "-n");
    }

    #[test]
    fn undeclared_flags_pick_the_right_slot() {
        let long = Flag::undeclared("--color");
        assert_eq!(long.long_name(), "--color");
        assert!(long.short_name().is_empty());
        assert!(!long.is_user_defined());

        let short = Flag::undeclared("-q");
        assert_eq!(short.short_name(), "-q");
        assert!(!short.has_value());
    }
}
