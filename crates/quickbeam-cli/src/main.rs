//! Quickbeam CLI - evaluates JSON-described primitive trees
//!
//! Stands in for a compiler front end: the tree file already names every
//! primitive, its operands and its source label.

mod output;
mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use quickbeam::{Engine, EngineConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quickbeam")]
#[command(version, about = "Evaluate array primitive trees")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a tree and print the result as JSON
    Eval {
        /// Path to the JSON tree
        tree: PathBuf,

        /// Call argument as JSON, repeatable
        #[arg(long = "arg", value_name = "JSON")]
        args: Vec<String>,

        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print per-primitive evaluation counters to stderr
        #[arg(long)]
        counters: bool,
    },

    /// List the registered operators
    Patterns,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,quickbeam=debug",
        _ => "warn,quickbeam=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Ok(EngineConfig::from_json(&text)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn eval(tree_path: PathBuf, args: Vec<String>, config: Option<PathBuf>, counters: bool) -> Result<()> {
    let engine = Engine::new(load_config(config.as_ref())?)?;
    let mut loader = tree::Loader::new(&engine);

    let text = std::fs::read_to_string(&tree_path)
        .with_context(|| format!("reading tree {}", tree_path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing tree {}", tree_path.display()))?;
    let root = loader
        .load(&json)
        .with_context(|| format!("building tree {}", tree_path.display()))?;

    let args = args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let json: serde_json::Value =
                serde_json::from_str(arg).with_context(|| format!("parsing --arg {}", i))?;
            loader.load(&json).with_context(|| format!("building --arg {}", i))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(tree = %tree_path.display(), args = args.len(), "evaluating");
    let result = engine.run(&root, args).context("evaluation failed")?;
    println!("{}", serde_json::to_string_pretty(&output::to_json(&result))?);

    if counters {
        for (key, counts) in engine.counters().snapshot() {
            eprintln!(
                "{:<24} {:>8} evals {:>12?}",
                key, counts.eval_count, counts.eval_time
            );
        }
    }
    Ok(())
}

fn patterns() {
    let registry = quickbeam::PatternRegistry::builtin();
    for pattern in registry.iter() {
        println!("{:<16} {}", pattern.name, pattern.help);
        for syntax in pattern.syntaxes {
            println!("{:<16}   {}", "", syntax);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Eval {
            tree,
            args,
            config,
            counters,
        } => eval(tree, args, config, counters),
        Command::Patterns => {
            patterns();
            Ok(())
        }
    }
}
