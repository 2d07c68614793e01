use anyhow::{Context, Result, bail};
use argline::{Arg, ArgParser, Flag, Value};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Flags and positionals to define before parsing, read from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Definition {
    #[serde(default)]
    pub flags: Vec<FlagDef>,
    #[serde(default)]
    pub args: Vec<ArgDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FlagDef {
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Present when the flag takes a value.
    #[serde(default)]
    pub value: Option<ValueDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ValueDef {
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ArgDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Definition {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read definition: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse definition: {}", path.display()))
    }

    /// Define every flag and positional on `parser`, in file order.
    pub fn apply(&self, parser: &mut ArgParser, with_callbacks: bool) -> Result<()> {
        for def in &self.flags {
            let flag = def.to_flag();
            let label = format!("{} {}", flag.short_name(), flag.long_name());
            let defined = if with_callbacks {
                parser.def_flag_with_callback(flag, |flag| {
                    tracing::info!(flag = flag.display_name(), "callback dispatched");
                })
            } else {
                parser.def_flag(flag)
            };
            if defined.is_sentinel() {
                bail!("invalid flag definition: '{}'", label.trim());
            }
        }
        for def in &self.args {
            parser.def_arg(def.to_arg());
        }
        Ok(())
    }
}

impl FlagDef {
    fn to_flag(&self) -> Flag {
        let long = self.long.as_deref().map(normalize_long).unwrap_or_default();
        let short = self.short.as_deref().map(normalize_short).unwrap_or_default();
        let mut flag = Flag::new(long, short);
        if let Some(description) = &self.description {
            flag = flag.help(description);
        }
        if let Some(value) = &self.value {
            flag = flag.with_value(value.to_value());
        }
        flag
    }
}

impl ValueDef {
    fn to_value(&self) -> Value {
        let mut value = if self.choices.is_empty() {
            Value::new()
        } else {
            Value::one_of(&self.choices)
        };
        if let Some(default) = &self.default {
            value = value.default_value(default);
        }
        if let Some(name) = &self.name {
            value = value.value_name(name);
        }
        if let Some(description) = &self.description {
            value = value.help(description);
        }
        value.required(self.required)
    }
}

impl ArgDef {
    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(&self.name).required(self.required);
        if let Some(description) = &self.description {
            arg = arg.help(description);
        }
        if let Some(default) = &self.default {
            arg = arg.default_value(default);
        }
        if !self.choices.is_empty() {
            arg = arg.one_of(&self.choices);
        }
        arg
    }
}

fn normalize_short(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        trimmed.to_string()
    } else {
        format!("-{trimmed}")
    }
}

fn normalize_long(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("--") {
        trimmed.to_string()
    } else {
        format!("--{}", trimmed.trim_start_matches('-'))
    }
}

#[cfg(test)]
mod tests {
    use super::{Definition, normalize_long, normalize_short};
    use argline::{ArgParser, Options};

    fn parser() -> ArgParser {
        ArgParser::with_options(Options::parse("help.add=false").unwrap())
    }

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize_short("v"), "-v");
        assert_eq!(normalize_short(" -v "), "-v");
        assert_eq!(normalize_long("verbose"), "--verbose");
        assert_eq!(normalize_long("-verbose"), "--verbose");
        assert_eq!(normalize_long("--verbose"), "--verbose");
    }

    #[test]
    fn applies_flags_and_args() {
        let definition: Definition = serde_json::from_str(
            r#"{
                "flags": [
                    {"long": "verbose", "short": "v", "description": "Chatty"},
                    {"long": "mode", "value": {"default": "fast", "choices": ["fast", "slow"]}}
                ],
                "args": [
                    {"name": "input", "required": true},
                    {"name": "level", "default": "3"}
                ]
            }"#,
        )
        .unwrap();

        let mut parser = parser();
        definition.apply(&mut parser, false).unwrap();

        let verbose = parser.get_flag("-v").unwrap();
        assert_eq!(verbose.long_name(), "--verbose");
        assert_eq!(verbose.description(), "Chatty");
        let mode = parser.get_flag("--mode").unwrap().value().unwrap();
        assert_eq!(mode.text(), "fast");
        assert_eq!(mode.choices(), ["fast", "slow"]);
        assert!(parser.arg(0).is_required());
        assert_eq!(parser.arg(1).text(), "3");
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let definition: Definition =
            serde_json::from_str(r#"{"flags": [{"short": "xyz"}]}"#).unwrap();
        let err = definition.apply(&mut parser(), false).unwrap_err();
        assert!(err.to_string().contains("-xyz"), "{err}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<Definition>(r#"{"flagz": []}"#).unwrap_err();
        assert!(err.to_string().contains("flagz"));
    }
}
