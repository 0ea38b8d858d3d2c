//! CLI entry point for `dbt-dialect`.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use _dbt_dialect_core::tools;
use _dbt_dialect_core::{CommandTranslator, ProjectConfig};

#[derive(Parser)]
#[command(
    name = "dbt-dialect",
    about = "Detect, resolve and translate warehouse-specific SQL in dbt projects"
)]
struct Cli {
    /// dbt project root (defaults to DBT_PROJECT_LOCATION, then the current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files containing syntax specific to a warehouse
    Scan {
        /// Warehouse whose syntax to look for
        #[arg(long)]
        source: String,
        /// Warehouse the files are meant to be translated to
        #[arg(long)]
        target: Option<String>,
    },
    /// Find project files matching a name or partial path
    Resolve { term: String },
    /// Guess the data-modeling pattern from target/compiled
    Classify,
    /// Run `dbt compile --log-format json` and collect its events
    Compile {
        /// dbt executable (defaults to DBT_EXECUTABLE, then `dbt`)
        #[arg(long)]
        executable: Option<PathBuf>,
    },
    /// Translate one file and save it under translated/<target>/
    Translate {
        file: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
        /// Translator program; receives SQL on stdin plus the source and
        /// target tags as trailing arguments
        #[arg(long = "with", required = true, num_args = 1.., allow_hyphen_values = true)]
        translator: Vec<String>,
    },
    /// Show the fingerprint rules for a warehouse
    Patterns { warehouse: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Value> {
    let mut config = ProjectConfig::from_env();
    if let Some(dir) = cli.project_dir {
        config.project_root = dir;
    }

    let payload = match cli.cmd {
        Commands::Scan { source, target } => {
            tools::identify_translation_candidates(&config, &source, target.as_deref())
        }
        Commands::Resolve { term } => tools::search_project_files(&config, &term),
        Commands::Classify => tools::analyze_schema(&config),
        Commands::Compile { executable } => {
            if let Some(exe) = executable {
                config.dbt_executable = exe;
            }
            tools::compile_project(&config)
        }
        Commands::Translate {
            file,
            source,
            target,
            translator,
        } => {
            let (program, args) = translator
                .split_first()
                .context("--with needs a translator program")?;
            let translator = CommandTranslator::new(program).args(args);
            tools::translate_file(&config, translator, &file, &source, &target)
        }
        Commands::Patterns { warehouse } => tools::warehouse_patterns(&warehouse),
    };
    Ok(payload)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let payload = run(cli)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    if payload["status"] == "error" {
        process::exit(1);
    }
    Ok(())
}
