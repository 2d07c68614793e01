use argline::{Arg, ArgParser, Counts, Flag, ParseError};
use serde::Serialize;

/// Outcome of one parse, as printed by the harness.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report<'a> {
    pub program: &'a str,
    pub success: bool,
    pub flags: Vec<&'a Flag>,
    pub args: &'a [Arg],
    pub errors: &'a [ParseError],
    pub counts: Counts,
}

impl<'a> Report<'a> {
    pub fn collect(parser: &'a ArgParser, success: bool) -> Self {
        Self {
            program: parser.program_name(),
            success,
            flags: parser.flags().filter(|f| f.is_set()).collect(),
            args: parser.args(),
            errors: parser.errors(),
            counts: parser.counts(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Program: {}\n", self.program));

        if !self.flags.is_empty() {
            out.push_str("\nFlags:\n");
            for flag in &self.flags {
                match flag.value() {
                    Some(value) if !value.is_empty() => {
                        out.push_str(&format!("  {} = {}\n", flag.display_name(), value.text()))
                    }
                    _ => out.push_str(&format!("  {}\n", flag.display_name())),
                }
            }
        }

        if !self.args.is_empty() {
            out.push_str("\nArguments:\n");
            for (index, arg) in self.args.iter().enumerate() {
                let label = if arg.name().is_empty() {
                    format!("#{index}")
                } else {
                    arg.name().to_string()
                };
                out.push_str(&format!("  {label} = {}\n", arg.text()));
            }
        }

        out.push_str(&format!(
            "\nFlags matched: {} defined, {} undefined\n",
            self.counts.flags.defined, self.counts.flags.undefined
        ));
        out.push_str(&format!(
            "Arguments matched: {} defined, {} undefined\n",
            self.counts.args.defined, self.counts.args.undefined
        ));

        if !self.errors.is_empty() {
            out.push_str(&format!("\nErrors: {}\n", self.errors.len()));
            for error in self.errors {
                out.push_str(&format!("  - [{}] {}\n", error.code(), error.message()));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Report;
    use argline::{Arg, ArgParser, Flag, Options, Value};

    #[test]
    fn renders_set_flags_and_positionals() {
        let mut parser = ArgParser::with_options(Options::parse("help.add=false").unwrap());
        parser.def_flag(Flag::new("--out", "-o").with_value(Value::new()));
        parser.def_flag(Flag::long("--quiet"));
        parser.def_arg(Arg::new("input"));
        let success = parser.parse(&["tool", "-o", "x.bin", "in", "more"]);

        let text = Report::collect(&parser, success).render();
        assert!(text.starts_with("Program: tool\n"));
        assert!(text.contains("  --out = x.bin\n"));
        assert!(!text.contains("--quiet"));
        assert!(text.contains("  input = in\n"));
        assert!(text.contains("  #1 = more\n"));
        assert!(text.contains("Arguments matched: 1 defined, 1 undefined\n"));
        assert!(!text.contains("Errors:"));
    }

    #[test]
    fn json_lists_errors_with_subjects() {
        let mut parser = ArgParser::with_options(Options::parse("help.add=false").unwrap());
        parser.def_arg(Arg::new("input").required(true));
        let success = parser.parse(&["tool"]);

        let json = serde_json::to_value(Report::collect(&parser, success)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["code"], "RequiredArgumentMissing");
        assert_eq!(json["errors"][0]["subject"]["kind"], "arg");
        assert_eq!(json["errors"][0]["subject"]["index"], 0);
    }
}
