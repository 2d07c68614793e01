mod definition;
mod report;

use anyhow::{Context, Result};
use argline::{ArgParser, Options};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use crate::definition::Definition;
use crate::report::Report;

#[derive(Parser)]
#[command(name = "argline")]
#[command(version, about = "Parse an argument vector against a flag definition", long_about = None)]
struct Cli {
    /// JSON file describing flags and positional arguments
    #[arg(short, long, value_name = "FILE")]
    definition: Option<PathBuf>,

    /// Parser options, e.g. "program.name=demo,help.show=2"
    #[arg(short, long, value_name = "OPTS", default_value = "")]
    options: String,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,

    /// Print the generated help text and exit
    #[arg(long)]
    help_text: bool,

    /// Attach a logging callback to every defined flag and dispatch after parsing
    #[arg(long)]
    run_callbacks: bool,

    /// Argument vector to parse; the first entry is the program name
    #[arg(last = true, value_name = "ARGV")]
    argv: Vec<String>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let options = Options::parse(&cli.options)
        .with_context(|| format!("invalid parser options: {}", cli.options))?;
    let mut parser = ArgParser::with_options(options);

    if let Some(path) = &cli.definition {
        let definition = Definition::from_file(path)?;
        definition.apply(&mut parser, cli.run_callbacks)?;
        tracing::debug!(
            flags = parser.registry().flag_count(),
            args = parser.args().len(),
            "definition applied"
        );
    }

    if cli.help_text {
        if let Some(program) = cli.argv.first().filter(|_| parser.program_name().is_empty()) {
            tracing::debug!(program, "program name taken from argv");
            parser.set_program_name(program);
        }
        print!("{}", parser.help());
        return Ok(ExitCode::SUCCESS);
    }

    let success = parser.parse(&cli.argv);
    if cli.run_callbacks {
        let fired = parser.dispatch_callbacks();
        tracing::debug!(fired, "callbacks dispatched");
    }

    let report = Report::collect(&parser, success);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
        if !success {
            eprint!("{}", parser.error());
        }
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
