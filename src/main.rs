//! urlmap: inspect a URL mapping table from the command line.
//!
//! The table is assembled from a TOML config (serialized tables, statics and
//! aliases), which makes the tool useful for checking URL layouts that a
//! running application exported with `TableResource`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use urlmap::config::{build_mapper, load_config};
use urlmap::mapping::{Params, TableOrder, Value};
use urlmap::observability::logging;

#[derive(Parser)]
#[command(name = "urlmap")]
#[command(about = "Render and match URLs of a mapping table", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "urlmap.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the serialized table
    Table {
        /// Sort by URL template instead of resource-id
        #[arg(long)]
        by_url: bool,
    },
    /// Render the URL of a resource-id
    Render {
        id: String,
        /// Positional values, root to leaf
        args: Vec<String>,
        /// Named value, as name=value
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print the human-readable pattern of a resource-id
    Pattern { id: String },
    /// Match a URL against a resource-id and print the values as JSON
    Match { id: String, url: String },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    logging::init(&config.observability)?;

    let base_dir = cli.config.parent().unwrap_or(Path::new("."));
    let mapper = build_mapper(&config, base_dir, None)?;

    match cli.command {
        Commands::Table { by_url } => {
            let order = if by_url { TableOrder::ByUrl } else { TableOrder::ById };
            for line in mapper.serialize_table(order) {
                println!("{line}");
            }
        }
        Commands::Render { id, args, params } => {
            let mut p = Params::new().args(args);
            for (name, value) in params {
                p = p.named(name, value);
            }
            println!("{}", mapper.render(&id, p)?);
        }
        Commands::Pattern { id } => {
            println!("{}", mapper.render_pattern(&id)?);
        }
        Commands::Match { id, url } => match mapper.match_url(&id, &url)? {
            Some(values) => {
                let json: serde_json::Map<String, serde_json::Value> = values
                    .into_iter()
                    .map(|(name, value)| (name, to_json(value)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            None => {
                eprintln!("'{url}' does not match {id}");
                return Ok(ExitCode::FAILURE);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Int(n) => n.into(),
        Value::Float(x) => x.into(),
        Value::Str(s) => s.into(),
    }
}
