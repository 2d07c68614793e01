use serde::Serialize;

use crate::value::Value;

/// The unnamed optional argument returned for out-of-range positional lookups.
pub static SENTINEL_ARG: Arg = Arg::sentinel();

/// A positional slot: a [`Value`] matched by position rather than by name.
///
/// Arguments declared by the caller are `user_defined`; the parser
/// synthesizes non-user-defined ones for positional tokens beyond the
/// declared slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Arg {
    #[serde(flatten)]
    value: Value,
    user_defined: bool,
}

impl Arg {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            value: Value::new().value_name(name),
            user_defined: true,
        }
    }

    const fn sentinel() -> Self {
        Self {
            value: Value::EMPTY,
            user_defined: false,
        }
    }

    pub(crate) fn synthesized(text: &str) -> Self {
        let mut value = Value::new();
        value.bind(text);
        Self {
            value,
            user_defined: false,
        }
    }

    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.value = self.value.help(description);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.value = self.value.required(required);
        self
    }

    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.value = self.value.default_value(text);
        self
    }

    pub fn one_of<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let value = std::mem::take(&mut self.value);
        self.value = Value::one_of(choices)
            .value_name(value.name())
            .help(value.description())
            .required(value.is_required())
            .default_value(value.default_text());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn name(&self) -> &str {
        self.value.name()
    }

    pub fn description(&self) -> &str {
        self.value.description()
    }

    pub fn text(&self) -> &str {
        self.value.text()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_set()
    }

    pub fn is_required(&self) -> bool {
        self.value.is_required()
    }

    pub fn is_user_defined(&self) -> bool {
        self.user_defined
    }
}
