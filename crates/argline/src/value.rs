use serde::Serialize;

/// A named, optionally defaulted, optionally required scalar.
///
/// `text` starts out as the default and holds the last token bound to the
/// value once `is_set` is true. Repeated bindings overwrite, they never
/// accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Value {
    text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    default: String,
    is_set: bool,
    required: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<String>,
}

impl Value {
    pub(crate) const EMPTY: Self = Self {
        text: String::new(),
        default: String::new(),
        is_set: false,
        required: false,
        name: String::new(),
        description: String::new(),
        choices: Vec::new(),
    };

    /// An optional value with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Value::new().default_value(text)`.
    pub fn with_default(text: impl Into<String>) -> Self {
        Self::new().default_value(text)
    }

    /// A value restricted (in help output) to one of `choices`.
    pub fn one_of<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn default_value(mut self, text: impl Into<String>) -> Self {
        self.default = text.into();
        self.text = self.default.clone();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Placeholder name shown in help, e.g. `FILE`.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn default_text(&self) -> &str {
        &self.default
    }

    pub fn is_set(&self) -> bool {
        self.is_set
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Whether `text` is acceptable for this value.
    ///
    /// Values without choices accept anything. The parser never calls this;
    /// it is up to the caller to reject out-of-set input.
    pub fn accepts(&self, text: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|c| c == text)
    }

    pub(crate) fn bind(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.is_set = true;
    }

    pub(crate) fn reset(&mut self) {
        self.text.clone_from(&self.default);
        self.is_set = false;
    }
}
