use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use json_logic::Evaluator;
use json_logic_builder::variables::{extract_variable_names, resolve_variables};
use json_logic_builder::{BuilderConfig, BuilderController, BuilderEvent, OperationCatalog};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "json-logic-builder", version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a rule against data.
    Eval(EvalArgs),
    /// List the variables a rule reads and what they resolve to.
    Vars(VarsArgs),
    /// Replay a script of builder events and print the final session state.
    Session(SessionArgs),
    /// Print the operation palette.
    Operations,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Rule JSON file.
    #[arg(long)]
    logic: PathBuf,

    /// Data JSON file. Defaults to `null`.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct VarsArgs {
    /// Rule JSON file.
    #[arg(long)]
    logic: PathBuf,

    /// Data JSON file. Defaults to `{}`.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// JSON array of events.
    #[arg(long)]
    events: PathBuf,

    /// Builder configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Eval(args) => cmd_eval(args),
        Command::Vars(args) => cmd_vars(args),
        Command::Session(args) => cmd_session(args),
        Command::Operations => cmd_operations(),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse json '{}'", path.display()))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let logic = read_json(&args.logic)?;
    let data = match &args.data {
        Some(path) => read_json(path)?,
        None => Value::Null,
    };
    let result = Evaluator::with_builtins()
        .apply(&logic, &data)
        .with_context(|| format!("evaluate '{}'", args.logic.display()))?;
    print_json(&result.into_json())
}

fn cmd_vars(args: VarsArgs) -> anyhow::Result<()> {
    let logic = read_json(&args.logic)?;
    let data = match &args.data {
        Some(path) => read_json(path)?,
        None => json!({}),
    };
    let names = extract_variable_names(&logic);
    let bindings = resolve_variables(&names, &Evaluator::with_builtins(), &data);
    print_json(&serde_json::to_value(bindings)?)
}

fn cmd_session(args: SessionArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => BuilderConfig::load(path).with_context(|| format!("load config '{}'", path.display()))?,
        None => BuilderConfig::default(),
    };
    let events: Vec<BuilderEvent> = serde_json::from_value(read_json(&args.events)?)
        .with_context(|| format!("parse events '{}'", args.events.display()))?;

    let mut session = BuilderController::new(config)?;
    let mut rejected = Vec::new();
    for (i, event) in events.into_iter().enumerate() {
        if let Err(e) = session.dispatch(event) {
            tracing::warn!(event = i, error = %e, "event rejected");
            rejected.push(json!({"event": i, "error": e.to_string()}));
        }
    }

    print_json(&json!({
        "document": session.document(),
        "result": session.result(),
        "variables": session.variables(),
        "rejected": rejected,
    }))
}

fn cmd_operations() -> anyhow::Result<()> {
    let catalog = OperationCatalog::default();
    for (category, ops) in catalog.grouped() {
        println!("{}", category.label());
        for op in ops {
            println!("  {:<14} {}", op.id, op.description);
        }
    }
    Ok(())
}
