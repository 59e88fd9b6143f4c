use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use option_parser_core::{
    EventRecord, OptionEvent, OptionFlags, ParseErrorKind, ParseOutcome, ParserFlags, Registry,
    RegistrationError, SubRegistry,
};
use option_parser_manifest::RegistryManifest;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format for parse reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "optparse")]
#[command(about = "Parse argument vectors against declarative option registries")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Log parser decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments against a registry loaded from a manifest.
    Parse(ParseArgs),
    /// Print help text for a manifest's options.
    Help(HelpArgs),
    /// Run the built-in demo registry against the given arguments.
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Registry manifest (.yaml, .yml, or .json).
    #[arg(long)]
    manifest: PathBuf,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Arguments to parse, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Registry manifest (.yaml, .yml, or .json).
    #[arg(long)]
    manifest: PathBuf,
    /// Show help for a single option.
    #[arg(long)]
    option: Option<String>,
    /// Show help for a single sub-option of `--option`.
    #[arg(long, requires = "option")]
    sub_option: Option<String>,
}

#[derive(Debug, Args)]
struct DemoArgs {
    /// Arguments to parse, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// How a command that ran to completion ended.
enum Status {
    Success,
    ParseFailed,
}

#[derive(Debug, Serialize)]
struct ParseReport {
    events: Vec<EventRecord>,
    options_parsed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    remainder: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

#[derive(Debug, Serialize)]
struct ErrorReport {
    kind: ParseErrorKind,
    context: String,
    message: String,
}

impl ParseReport {
    fn new(outcome: &ParseOutcome<'_>, events: Vec<EventRecord>) -> Self {
        Self {
            events,
            options_parsed: outcome.options_parsed(),
            remainder: outcome
                .remainder()
                .ok()
                .map(|tokens| tokens.iter().map(|token| token.to_string()).collect()),
            error: outcome.error().map(|err| ErrorReport {
                kind: err.kind(),
                context: err.context().to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            let name = match &event.parent {
                Some(parent) => format!("{parent}.{}", event.name),
                None => event.name.clone(),
            };
            match &event.value {
                Some(value) => out.push_str(&format!("{name} = {value}\n")),
                None => out.push_str(&format!("{name}\n")),
            }
        }
        out.push_str(&format!("options parsed: {}\n", self.options_parsed));
        if let Some(remainder) = &self.remainder {
            if remainder.is_empty() {
                out.push_str("remainder: (none)\n");
            } else {
                out.push_str(&format!("remainder: {}\n", remainder.join(" ")));
            }
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("parse error: {}\n", error.message));
        }
        out
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Demo(args) => run_demo(args),
    };

    match result {
        Ok(Status::Success) => {}
        Ok(Status::ParseFailed) => std::process::exit(2),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Prepends a program name so the vector matches what `parse` expects.
fn with_program_name(args: Vec<String>) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("optparse".to_string());
    argv.extend(args);
    argv
}

fn load_manifest(path: &Path) -> Result<RegistryManifest, String> {
    RegistryManifest::load(path)
        .map_err(|err| format!("Failed to load manifest '{}': {err}", path.display()))
}

fn run_parse(args: ParseArgs) -> Result<Status, String> {
    let manifest = load_manifest(&args.manifest)?;
    let events: Arc<Mutex<Vec<EventRecord>>> = Arc::default();
    let sink = Arc::clone(&events);
    let registry = manifest
        .build(move |event| {
            if let Ok(mut events) = sink.lock() {
                events.push(event.to_record());
            }
        })
        .map_err(|err| format!("Failed to build registry: {err}"))?;

    let argv = with_program_name(args.args);
    debug!(arguments = argv.len() - 1, "parsing arguments");
    let outcome = registry.parse(&argv);
    let events = events
        .lock()
        .map(|mut events| std::mem::take(&mut *events))
        .map_err(|_| "Event collector was poisoned".to_string())?;
    let report = ParseReport::new(&outcome, events);

    let rendered = match args.format {
        CliOutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(&report)
            .map_err(|err| format!("Failed to serialize report: {err}"))?,
        CliOutputFormat::Text => report.to_text(),
    };
    print!("{rendered}");
    if matches!(args.format, CliOutputFormat::Json) {
        println!();
    }

    Ok(if outcome.is_success() {
        Status::Success
    } else {
        Status::ParseFailed
    })
}

fn run_help(args: HelpArgs) -> Result<Status, String> {
    let registry = load_manifest(&args.manifest)?
        .build(|_| {})
        .map_err(|err| format!("Failed to build registry: {err}"))?;

    let help = match (&args.option, &args.sub_option) {
        (Some(option), Some(sub_option)) => registry
            .sub_option_help(option, sub_option)
            .ok_or_else(|| format!("No sub-option '{sub_option}' under option '{option}'"))?,
        (Some(option), None) => registry
            .option_help(option)
            .ok_or_else(|| format!("No option named '{option}'"))?,
        (None, _) => registry.help(),
    };
    print!("{help}");
    Ok(Status::Success)
}

fn demo_command(event: &OptionEvent<'_>) {
    println!("{}", event.name);
    match event.alias {
        Some('t') => println!("    Time: {}", Local::now().format("%H:%M:%S")),
        Some('d') => println!("    Date: {}", Local::now().format("%b %d %Y")),
        Some('n') => println!("    Project Name: demo"),
        Some('e') => println!("    {}", event.value.unwrap_or_default()),
        _ => {}
    }
}

fn demo_property(event: &OptionEvent<'_>) {
    if let Some(value) = event.value {
        println!("    {} = {value}", event.name);
    }
}

fn demo_registry() -> Result<Registry, RegistrationError> {
    let mut registry = Registry::new(ParserFlags::all()).with_handler(demo_command);
    registry.add_option(
        "time",
        Some('t'),
        OptionFlags::new().forbid_value(),
        "Gets the current time.",
    )?;
    registry.add_option(
        "date",
        Some('d'),
        OptionFlags::new().forbid_value(),
        "Gets the current date.",
    )?;
    registry.add_option(
        "name",
        Some('n'),
        OptionFlags::new().forbid_value(),
        "Gets the project name.",
    )?;
    registry.add_option(
        "echo",
        Some('e'),
        OptionFlags::new().allow_duplicates().require_value(),
        "Echos the specified value.",
    )?;
    let properties = registry
        .add_option(
            "Properties",
            Some('P'),
            OptionFlags::new().forbid_value(),
            "Specifies the following properties:",
        )?
        .attach_sub_options(SubRegistry::new(ParserFlags::new()).with_handler(demo_property))?;
    properties.add_option(
        "config",
        Some('c'),
        OptionFlags::new().require().require_value(),
        "Specifies the config file.",
    )?;
    properties.add_option(
        "name",
        Some('n'),
        OptionFlags::new().require_value(),
        "Specifies the project name.",
    )?;
    Ok(registry)
}

fn run_demo(args: DemoArgs) -> Result<Status, String> {
    let registry = demo_registry().map_err(|err| format!("Failed to build demo registry: {err}"))?;

    println!("{}", registry.help());
    if let Some(help) = registry.option_help("Properties") {
        println!("{help}");
    }
    if let Some(help) = registry.sub_option_help("Properties", "name") {
        println!("{help}");
    }

    let argv = with_program_name(args.args);
    let outcome = registry.parse(&argv);
    if let Some(message) = outcome.error_message() {
        println!("{message}");
        return Ok(Status::ParseFailed);
    }

    if let Ok(remainder) = outcome.remainder() {
        if !remainder.is_empty() {
            println!("Remainder:");
            for token in remainder {
                println!("    {token}");
            }
        }
    }
    Ok(Status::Success)
}
