//! Help text rendering over registry state.

use crate::arg::Arg;
use crate::flag::Flag;
use crate::options::{HelpShow, Options};
use crate::registry::Registry;
use crate::value::Value;

fn listed(show: HelpShow, user_defined: bool, description: &str) -> bool {
    match show {
        HelpShow::ShowOnesWithDescription => !description.trim().is_empty(),
        HelpShow::ShowAllDefined => user_defined,
        HelpShow::ShowAll => true,
    }
}

fn format_arg_left(arg: &Arg) -> String {
    if arg.is_required() {
        format!("<{}>", arg.name())
    } else {
        format!("[<{}>]", arg.name())
    }
}

fn format_placeholder(value: &Value) -> String {
    let inner = if !value.choices().is_empty() {
        value.choices().join("|")
    } else if !value.name().is_empty() {
        value.name().to_string()
    } else {
        "VALUE".to_string()
    };
    if value.is_required() {
        format!("<{inner}>")
    } else {
        format!("[<{inner}>]")
    }
}

fn format_flag_left(flag: &Flag) -> String {
    let mut names: Vec<&str> = Vec::new();
    if !flag.short_name().is_empty() {
        names.push(flag.short_name());
    }
    if !flag.long_name().is_empty() {
        names.push(flag.long_name());
    }
    let mut out = names.join(", ");
    if let Some(value) = flag.value() {
        out.push(' ');
        out.push_str(&format_placeholder(value));
    }
    out
}

fn format_help(description: &str, value: Option<&Value>) -> String {
    let mut out = description.trim().to_string();
    let Some(value) = value else {
        return out;
    };
    if !value.default_text().is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("[default: {}]", value.default_text()));
    }
    out
}

fn push_rows(out: &mut String, heading: &str, rows: &[(String, String)], options: &Options) {
    if rows.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(heading);
    out.push('\n');
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("{}{}\n", options.tab, left));
        } else {
            out.push_str(&format!(
                "{}{:width$}  {}\n",
                options.tab,
                left,
                help,
                width = width
            ));
        }
        if !options.help.compact {
            out.push('\n');
        }
    }
}

/// Render usage, arguments and option flags.
///
/// Arguments render as `<name>` when required and `[<name>]` otherwise.
/// Synthesized (unnamed) arguments are never listed.
pub fn render(registry: &Registry, options: &Options) -> String {
    let show = options.help.show;
    let args: Vec<&Arg> = registry
        .positionals()
        .iter()
        .filter(|a| !a.name().is_empty())
        .filter(|a| listed(show, a.is_user_defined(), a.description()))
        .collect();
    let flags: Vec<&Flag> = registry
        .flags()
        .map(|(_, f)| f)
        .filter(|f| listed(show, f.is_user_defined(), f.description()))
        .collect();

    let mut out = format!("usage: {}", options.program_name);
    if !flags.is_empty() {
        out.push_str(" [options]");
    }
    for arg in &args {
        out.push(' ');
        out.push_str(&format_arg_left(arg));
    }
    out.push('\n');

    let arg_rows: Vec<(String, String)> = args
        .iter()
        .map(|a| {
            let mut help = format_help(a.description(), Some(a.value()));
            if !a.value().choices().is_empty() {
                if !help.is_empty() {
                    help.push(' ');
                }
                help.push_str(&format!(
                    "[possible values: {}]",
                    a.value().choices().join(", ")
                ));
            }
            (format_arg_left(a), help)
        })
        .collect();
    push_rows(&mut out, "Arguments:", &arg_rows, options);

    let flag_rows: Vec<(String, String)> = flags
        .iter()
        .map(|f| (format_flag_left(f), format_help(f.description(), f.value())))
        .collect();
    push_rows(&mut out, "Option flags:", &flag_rows, options);

    out
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::arg::Arg;
    use crate::flag::Flag;
    use crate::options::{HelpShow, Options};
    use crate::registry::Registry;
    use crate::value::Value;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.define_flag(Flag::new("--help", "-h").help("Show this help."));
        registry.define_flag(
            Flag::new("--output", "-o")
                .help("Output file")
                .with_value(Value::new().value_name("FILE").required(true)),
        );
        registry.define_flag(
            Flag::long("--mode").with_value(Value::one_of(["fast", "slow"]).default_value("fast")),
        );
        registry.define_positional(Arg::new("input").help("Input file").required(true));
        registry.define_positional(Arg::new("extra"));
        registry.lookup_flag("--undeclared");
        registry
    }

    fn options() -> Options {
        Options {
            program_name: "demo".to_string(),
            tab: "  ".to_string(),
            ..Options::default()
        }
    }

    #[test]
    fn renders_usage_arguments_and_flags() {
        let text = render(&registry(), &options());

        assert!(text.starts_with("usage: demo [options] <input> [<extra>]\n"));
        assert!(text.contains("\nArguments:\n"));
        assert!(text.contains("  <input>    Input file\n"));
        assert!(text.contains("  [<extra>]\n"));
        assert!(text.contains("\nOption flags:\n"));
        assert!(text.contains("-h, --help"));
        assert!(text.contains("-o, --output <FILE>   Output file"));
        assert!(text.contains("--mode [<fast|slow>]  [default: fast]"));
        assert!(!text.contains("--undeclared"));
    }

    #[test]
    fn show_levels_filter_entries() {
        let mut options = options();

        options.help.show = HelpShow::ShowAll;
        let all = render(&registry(), &options);
        assert!(all.contains("--undeclared"));

        options.help.show = HelpShow::ShowOnesWithDescription;
        let described = render(&registry(), &options);
        assert!(described.contains("--output"));
        assert!(!described.contains("--mode"));
        assert!(!described.contains("[<extra>]"));
    }

    #[test]
    fn loose_layout_separates_entries() {
        let mut options = options();
        options.help.compact = false;
        let text = render(&registry(), &options);
        assert!(text.contains("Input file\n\n"));
    }

    #[test]
    fn argument_choices_are_listed() {
        let mut registry = Registry::new();
        registry.define_positional(Arg::new("level").one_of(["low", "high"]));
        let text = render(&registry, &options());
        assert!(text.contains("[<level>]  [possible values: low, high]"));
    }
}
