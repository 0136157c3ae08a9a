//! `cjson` CLI: format, check, and inspect JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Normalize a document (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | cjson format
//!
//! # Normalize from file to file
//! cjson format -i data.json -o data.out.json
//!
//! # Validate only
//! cjson check -i data.json
//!
//! # Show size, node counts and nesting depth
//! cjson stats -i data.json
//!
//! # Log decoder diagnostics to stderr
//! cjson --verbose check -i data.json
//! ```

use anyhow::{Context, Result};
use cjson_core::Value;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cjson", version, about = "Lenient JSON codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder and encoder diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode then re-encode with canonical separators
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode only; print "ok" when the document is accepted
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Show document statistics (size, node counts, nesting depth)
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format { input, output } => {
            let value = read_document(input.as_deref())?;
            let mut text = cjson_core::encode(&value).context("Failed to encode document")?;
            debug!(bytes = text.len(), "formatted");
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            read_document(input.as_deref())?;
            println!("ok");
        }
        Commands::Stats { input } => {
            let bytes = read_input(input.as_deref())?;
            let value = cjson_core::decode(&bytes).context("Failed to decode JSON")?;
            let stats = Stats::collect(&value);
            println!("Size:      {} bytes", bytes.len());
            println!("Nodes:     {}", stats.total());
            println!("  objects: {}", stats.objects);
            println!("  arrays:  {}", stats.arrays);
            println!("  strings: {}", stats.strings);
            println!("  numbers: {}", stats.numbers);
            println!("  bools:   {}", stats.bools);
            println!("  nulls:   {}", stats.nulls);
            println!("Max depth: {}", stats.max_depth);
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Node counts by kind. Depth counts enclosing containers, so a bare scalar
/// has depth 0 and `[]` has depth 1.
#[derive(Debug, Default, PartialEq)]
struct Stats {
    objects: usize,
    arrays: usize,
    strings: usize,
    numbers: usize,
    bools: usize,
    nulls: usize,
    max_depth: usize,
}

impl Stats {
    fn collect(value: &Value) -> Self {
        let mut stats = Stats::default();
        stats.visit(value, 0);
        stats
    }

    fn visit(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.nulls += 1,
            Value::Bool(_) => self.bools += 1,
            Value::Integer(_) | Value::Float(_) => self.numbers += 1,
            Value::String(_) => self.strings += 1,
            Value::Array(items) => {
                self.arrays += 1;
                self.max_depth = self.max_depth.max(depth + 1);
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            Value::Object(map) => {
                self.objects += 1;
                self.max_depth = self.max_depth.max(depth + 1);
                for item in map.values() {
                    self.visit(item, depth + 1);
                }
            }
        }
    }

    fn total(&self) -> usize {
        self.objects + self.arrays + self.strings + self.numbers + self.bools + self.nulls
    }
}

fn read_document(path: Option<&str>) -> Result<Value> {
    let bytes = read_input(path)?;
    cjson_core::decode(&bytes).context("Failed to decode JSON")
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    let buf = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    debug!(bytes = buf.len(), source = path.unwrap_or("<stdin>"), "read input");
    Ok(buf)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
