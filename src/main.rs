//! Isidore CLI - keep track of hosts and tags, export Ansible inventories

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use isidore::cli::{Args, SubCommand};
use isidore::shell::command::ShowTarget;
use isidore::shell::{execute, Command};
use isidore::{format_inventory, run_script, run_words, Config, Inventory, InventoryFormat, Store};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args, config: &Config) {
    let filter = match args.log_override() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .ok()
            .or_else(|| config.log_level().and_then(|l| EnvFilter::try_new(l).ok()))
            .unwrap_or_else(|| EnvFilter::new("warn")),
    };
    let layer = fmt::layer().compact().with_writer(io::stderr);
    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config = Config::load(args.config.as_deref())?;
    init_logging(&args, &config);

    let path = args.database.clone().unwrap_or_else(|| config.database_path());
    let store = Store::open(&path)
        .with_context(|| format!("cannot open database {}", path.display()))?;
    debug!(path = %path.display(), "database ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command() {
        SubCommand::Shell => {
            drop(out);
            return shell(&store);
        }

        SubCommand::Exec { words } => run_words(&store, &words, &mut out)?,

        SubCommand::Inventory { list: true, .. } => {
            let inventory = Inventory::load(&store)?;
            writeln!(out, "{}", format_inventory(&inventory, InventoryFormat::Json)?)?;
        }

        SubCommand::Inventory { host: Some(hostname), .. } => {
            let inventory = Inventory::load(&store)?;
            let vars = inventory
                .host(&hostname)
                .map_or_else(|| json!({}), |details| details.vars.clone());
            writeln!(out, "{}", serde_json::to_string_pretty(&vars)?)?;
        }

        SubCommand::Inventory { format, .. } => {
            execute(&store, &Command::Show(ShowTarget::Inventory(format)), &mut out)?
        }

        SubCommand::Init => {
            writeln!(out, "Isidore version: {}", Store::library_version())?;
            writeln!(out, "Isidore database version: {}", store.database_version()?)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Interactive on a terminal; otherwise stdin is a script.
fn shell(store: &Store) -> Result<ExitCode> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        isidore::repl::run_repl(store)?;
        return Ok(ExitCode::SUCCESS);
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    let failures = run_script(store, stdin.lock(), &mut stdout.lock(), &mut stderr.lock())?;
    if failures > 0 {
        debug!(failures, "script finished with failures");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
