//! Collection Typegen CLI
//!
//! Generates the type-declaration and validator artifacts from a collection
//! export, prints either one, or checks the files on disk for drift.
//!
//! Usage:
//!   collection-typegen --collections pb_schema.json generate
//!   collection-typegen --collections pb_schema.json print --target zod
//!   collection-typegen --collections pb_schema.json --config typegen.toml check

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use collection_typegen::{DriftKind, Generator, GeneratorConfig, JsonExportSource};
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collection-typegen")]
#[command(about = "Generate TypeScript types and zod validators from collection metadata")]
struct Cli {
    /// Config file layered over typegen.toml and TYPEGEN__* variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Collection export (JSON array or paginated list response)
    #[arg(long, global = true, default_value = "pb_schema.json")]
    collections: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every enabled artifact to its output path
    Generate,
    /// Print one artifact to stdout
    Print {
        #[arg(short, long, value_enum, default_value = "ts")]
        target: Target,
    },
    /// Fail if any enabled artifact on disk is missing or out of date
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Ts,
    Zod,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a check found drift
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = GeneratorConfig::load_from(cli.config.as_deref()).context("loading config")?;
    let generator = Generator::new(config)?;
    let source = JsonExportSource::new(&cli.collections);

    match cli.command {
        Commands::Generate => {
            let written = generator
                .run(&source)
                .with_context(|| format!("generating from {}", cli.collections.display()))?;
            if written.is_empty() {
                eprintln!("⚠️  Both artifacts are disabled, nothing written");
            }
            for path in written {
                eprintln!("✅ Wrote {}", path.display());
            }
            Ok(true)
        }
        Commands::Print { target } => {
            let artifacts = generator.generate(&source)?;
            let output = match target {
                Target::Ts => artifacts.ts_schema,
                Target::Zod => artifacts.zod_schema,
            };
            print!("{}", output.code);
            Ok(true)
        }
        Commands::Check => {
            let drift = generator.check(&source)?;
            if drift.is_empty() {
                eprintln!("✅ Generated artifacts are up to date");
                return Ok(true);
            }

            for item in &drift {
                match item.kind {
                    DriftKind::Missing => eprintln!("❌ Missing: {}", item.path.display()),
                    DriftKind::Stale => {
                        eprintln!("❌ Stale: {}", item.path.display());
                        print_diff(item.actual.as_deref().unwrap_or_default(), &item.expected);
                    }
                }
            }
            eprintln!("\nRun `collection-typegen generate` to update them");
            Ok(false)
        }
    }
}

fn print_diff(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    eprint!(
        "{}",
        diff.unified_diff().context_radius(3).header("on disk", "generated")
    );
}
