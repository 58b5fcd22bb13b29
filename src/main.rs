//! Clipline - transform clipboard text with built-in editors and macros.
//!
//! # Usage
//!
//! ```bash
//! pbpaste | clipline columnAlign 3 , | pbcopy
//! clipline --input data.tsv columnAlign
//! clipline --macros ~/macros.json5 csvcols
//! clipline --list
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clipline::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use clipline::dispatch::{Dispatcher, Failure, Outcome};
use clipline::editor::{Registry, ResponseKind};
use clipline::macros::MacroStore;
use clipline::tokenizer::unescape;

/// Transform text with built-in editors and user-defined macros
#[derive(Parser, Debug)]
#[command(name = "clipline", version, about, long_about = None)]
struct Cli {
    /// Editor or macro name followed by its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,

    /// Macro definition file (JSON5)
    #[arg(short, long, value_name = "PATH")]
    macros: Option<PathBuf>,

    /// Read text from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print the result and responses as JSON
    #[arg(long)]
    json: bool,

    /// Log each step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// List built-in editors and macros
    #[arg(long)]
    list: bool,

    /// Show the full description of an editor
    #[arg(long, value_name = "NAME")]
    describe: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// `--verbose` wins, then `RUST_LOG`, then `warn`.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn print_listing(dispatcher: &Dispatcher) {
    println!("Editors:");
    for (name, description) in dispatcher.registry().list() {
        println!("  {name}  -  {description}");
    }
    match dispatcher.macros() {
        Ok(store) if store.is_empty() => println!("\nNo macros defined."),
        Ok(store) => {
            println!("\nMacros:");
            for line in store.describe().lines() {
                println!("  {line}");
            }
        }
        Err(err) => println!("\nMacros unavailable: {err}"),
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn report(outcome: &Outcome, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, outcome).context("Failed to write JSON")?;
        writeln!(stdout)?;
        return Ok(());
    }
    stdout.write_all(outcome.text.as_bytes())?;
    stdout.flush()?;
    for response in &outcome.responses {
        match response.kind {
            ResponseKind::Transient => eprintln!("{}", response.message),
            ResponseKind::Persistent => eprintln!("persistent: {}", response.message),
        }
    }
    Ok(())
}

fn report_failure(failure: &Failure, json: bool) -> Result<()> {
    if json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, failure).context("Failed to write JSON")?;
        writeln!(stdout)?;
        return Ok(());
    }
    for response in &failure.responses {
        eprintln!("{}", response.message);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        macros: cli.macros.clone(),
        verbose: cli.verbose,
        json: cli.json,
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.verbose);

    let macro_path = effective.macro_path();
    let macros = MacroStore::load(macro_path.as_deref());
    if let Err(err) = &macros {
        tracing::debug!("Macros unavailable: {err}");
    }
    let dispatcher = Dispatcher::new(Registry::builtin(), macros);

    if cli.list {
        print_listing(&dispatcher);
        return Ok(());
    }
    if let Some(name) = &cli.describe {
        let Some(text) = dispatcher.registry().describe(name) else {
            anyhow::bail!("No editor named {name}");
        };
        print!("{text}");
        return Ok(());
    }
    if cli.command.is_empty() {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No command given. Try --list");
    }

    let tokens: Vec<String> = cli.command.iter().map(|t| unescape(t)).collect();
    let text = read_input(cli.input.as_ref())?;

    match dispatcher.dispatch_tokens(&tokens, text) {
        Ok(outcome) => report(&outcome, effective.json),
        Err(failure) => {
            report_failure(&failure, effective.json)?;
            Err(anyhow::Error::new(failure).context("Command failed"))
        }
    }
}
