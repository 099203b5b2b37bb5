//! `jsonstruct` CLI — round-trip JSON through struct trees and find unset containers.
//!
//! ## Usage
//!
//! ```sh
//! # JSON -> struct tree -> JSON (stdin → stdout, pretty-printed)
//! echo '{"name":"Alice","tags":[]}' | jsonstruct roundtrip
//!
//! # Same, without the empty-container placeholder (fails on `tags`)
//! echo '{"name":"Alice","tags":[]}' | jsonstruct roundtrip --unpatched
//!
//! # Variant counts, depth and unset slots
//! jsonstruct inspect -i data.json --json
//!
//! # List every path that needs the placeholder workaround
//! jsonstruct check -i data.json
//! ```
//!
//! Logging goes to stderr; `RUST_LOG` is honoured and `-v` raises the default level.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use jsonstruct_core::{ConvertOptions, Struct, TreeStats};
use log::{info, LevelFilter};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "jsonstruct",
    version,
    about = "Round-trip JSON through tagged-union struct trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON object to a struct tree and back
    Roundtrip {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Leave empty containers uncommitted
        #[arg(long)]
        unpatched: bool,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Show variant counts, nesting depth and unset slots of the tree
    Inspect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Leave empty containers uncommitted
        #[arg(long)]
        unpatched: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the paths whose empty containers need the placeholder workaround
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Roundtrip {
            input,
            output,
            unpatched,
            compact,
        } => {
            let json = read_input(input.as_deref())?;
            let tree = build_tree(&json, unpatched)?;
            let rendered = if compact {
                jsonstruct_core::to_json_string(&tree)
            } else {
                jsonstruct_core::to_json_string_pretty(&tree)
            };
            let out = rendered.context("Failed to read the struct tree back into JSON")?;
            write_output(output.as_deref(), &out)?;
        }
        Commands::Inspect {
            input,
            unpatched,
            json,
        } => {
            let source = read_input(input.as_deref())?;
            let tree = build_tree(&source, unpatched)?;
            let stats = jsonstruct_core::inspect_struct(&tree);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        Commands::Check { input } => {
            let json = read_input(input.as_deref())?;
            let unpatched = build_tree(&json, true)?;
            let paths = jsonstruct_core::unset_paths(&unpatched);
            if paths.is_empty() {
                println!("No empty containers: the unpatched conversion reads back cleanly.");
            } else {
                println!(
                    "{} empty container(s) need the placeholder workaround:",
                    paths.len()
                );
                for path in &paths {
                    println!("  {}", path);
                }
            }

            let patched = build_tree(&json, false)?;
            jsonstruct_core::struct_to_json(&patched)
                .context("Patched struct tree failed to read back")?;
            println!("Patched conversion reads back cleanly.");
        }
    }

    Ok(())
}

/// Map `-v` occurrences to a default filter; `RUST_LOG` still overrides it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn build_tree(json: &str, unpatched: bool) -> Result<Struct> {
    let options = if unpatched {
        ConvertOptions::unpatched()
    } else {
        ConvertOptions::default()
    };
    info!("building struct tree with {:?}", options.empty_policy);
    jsonstruct_core::from_json_str_with(json, &options)
        .context("Failed to convert JSON into a struct tree")
}

fn print_stats(stats: &TreeStats) {
    println!("Structs:    {}", stats.structs);
    println!("Lists:      {}", stats.lists);
    println!("Strings:    {}", stats.strings);
    println!("Numbers:    {}", stats.numbers);
    println!("Bools:      {}", stats.bools);
    println!("Nulls:      {}", stats.nulls);
    println!("Max depth:  {}", stats.max_depth);
    if stats.is_readable() {
        println!("Unset:      none");
    } else {
        println!("Unset:      {}", stats.unset_paths.join(", "));
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
