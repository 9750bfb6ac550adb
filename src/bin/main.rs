//! hashfn CLI - evaluate and explain digest functions
//!
//! Usage:
//!   hashfn hash <algorithm> [values...] [--null-token <token>] [--output text|json]
//!   hashfn explain <algorithm> <column>
//!   hashfn functions
//!
//! Examples:
//!   hashfn hash sha1 abc
//!   printf 'foo\n\\N\nbar\n' | hashfn hash sha256 --output json
//!   hashfn explain md5 user_name

use clap::{Parser, Subcommand, ValueEnum};
use hashfn::config::{EngineConfig, ExecutionContext, Settings};
use hashfn::function::{Function, StrColumn};
use hashfn::lanes::LaneExecutor;
use hashfn::plan::explain;
use hashfn::record::Row;
use hashfn::registry::FunctionRegistry;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hashfn")]
#[command(about = "hashfn - digest scalar functions for string columns")]
#[command(version)]
struct Cli {
    /// Path to a hashfn.toml (defaults to the standard search locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash values (or stdin lines) with a digest function
    Hash {
        /// Function name, e.g. sha1
        function: String,

        /// Values to hash; reads stdin lines when empty
        values: Vec<String>,

        /// Input value treated as NULL
        #[arg(long, default_value = "\\N")]
        null_token: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,

        /// Number of execution lanes (overrides config)
        #[arg(long)]
        lanes: Option<usize>,
    },

    /// Print the plan rendering of `<function>(<column>)`
    Explain {
        function: String,
        column: String,
    },

    /// List registered function signatures
    Functions,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One digest per line, `null` for NULL
    Text,
    /// One JSON object per line
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = EngineConfig::from_settings(&settings);
    let registry = match FunctionRegistry::with_config(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Registry error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Hash {
            function,
            values,
            null_token,
            output,
            lanes,
        } => cmd_hash(
            &registry,
            &config,
            &function,
            values,
            &null_token,
            output,
            lanes,
        ),
        Commands::Explain { function, column } => {
            cmd_explain(&registry, &config, &function, &column)
        }
        Commands::Functions => cmd_functions(&registry),
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, hashfn::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn compile(
    registry: &FunctionRegistry,
    config: &EngineConfig,
    ctx: &ExecutionContext,
    function: &str,
    column: &str,
) -> Result<Box<dyn Function>, hashfn::FunctionError> {
    let arg: Box<dyn Function> = Box::new(StrColumn::new(column, 0));
    registry.resolve(function, 0, vec![arg], &[function.len() + 1], config, ctx)
}

fn cmd_hash(
    registry: &FunctionRegistry,
    config: &EngineConfig,
    function: &str,
    values: Vec<String>,
    null_token: &str,
    output: OutputFormat,
    lanes: Option<usize>,
) -> ExitCode {
    let mut ctx = ExecutionContext::new(config);
    if let Some(lanes) = lanes {
        ctx = ctx.with_lanes(lanes);
    }

    let compiled = match compile(registry, config, &ctx, function, "value") {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let inputs = if values.is_empty() {
        match io::stdin().lock().lines().collect::<Result<Vec<_>, _>>() {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        values
    };

    let rows: Vec<Row> = inputs
        .iter()
        .map(|v| Row::single(if v == null_token { None } else { Some(v.as_str()) }))
        .collect();

    let digests = match LaneExecutor::from_context(config, &ctx).evaluate(compiled.as_ref(), &rows)
    {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Evaluation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (input, digest) in inputs.iter().zip(&digests) {
        match output {
            OutputFormat::Text => println!("{}", digest.as_deref().unwrap_or("null")),
            OutputFormat::Json => {
                let input = if input == null_token {
                    None
                } else {
                    Some(input)
                };
                println!(
                    "{}",
                    serde_json::json!({ "input": input, "digest": digest })
                );
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_explain(
    registry: &FunctionRegistry,
    config: &EngineConfig,
    function: &str,
    column: &str,
) -> ExitCode {
    let ctx = ExecutionContext::new(config);
    match compile(registry, config, &ctx, function, column) {
        Ok(compiled) => {
            println!("{}", explain(compiled.as_ref()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_functions(registry: &FunctionRegistry) -> ExitCode {
    for signature in registry.signatures() {
        println!("{}", signature);
    }
    ExitCode::SUCCESS
}
