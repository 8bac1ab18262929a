//! `cowjson` CLI: parse, validate and inspect JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Re-serialize as compact JSON with sorted keys (stdin → stdout)
//! echo '{"name":"Cain","age":23}' | cowjson format
//!
//! # From file to file
//! cowjson format -i data.json -o data.min.json
//!
//! # Accept trailing content after the document, cap nesting at 64 levels
//! cowjson format --lenient --max-depth 64 -i data.json
//!
//! # Check that a document parses; exit status 1 if not
//! cowjson validate -i data.json
//!
//! # Show value counts by type and the deepest nesting level
//! cowjson stats -i data.json
//!
//! # Debug logging on stderr (or set RUST_LOG)
//! cowjson --verbose format -i data.json
//! ```

use std::collections::BTreeMap;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cowjson::{Json, JsonType, ParseOptions, DEFAULT_MAX_DEPTH};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cowjson",
    version,
    about = "Parse, validate and inspect JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser activity to stderr at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON and print it back as compact text with sorted keys
    Format {
        #[command(flatten)]
        parse: ParseArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check that the input parses, printing nothing on success
    Validate {
        #[command(flatten)]
        parse: ParseArgs,
    },
    /// Show document statistics (value counts by type, nesting depth, sizes)
    Stats {
        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[derive(Args)]
struct ParseArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Maximum array/object nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Ignore anything after the root value instead of failing
    #[arg(long)]
    lenient: bool,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let base = if self.lenient {
            ParseOptions::lenient()
        } else {
            ParseOptions::strict()
        };
        base.with_max_depth(self.max_depth)
    }

    /// Reads the input and parses it with the requested options.
    fn load(&self) -> Result<(String, Json)> {
        let text = read_input(self.input.as_deref())?;
        let options = self.options();
        debug!(
            bytes = text.len(),
            max_depth = options.max_depth,
            reject_trailing = options.reject_trailing,
            "parsing input"
        );
        let value = cowjson::parse_with_options(&text, options)
            .with_context(|| format!("Failed to parse {}", self.source_name()))?;
        debug!(root = %value.json_type(), "parsed document");
        Ok((text, value))
    }

    fn source_name(&self) -> &str {
        self.input.as_deref().unwrap_or("stdin")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Format { parse, output } => {
            let (_, value) = parse.load()?;
            let mut text = value.to_json_string();
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Validate { parse } => {
            parse.load()?;
            info!(source = parse.source_name(), "input is valid JSON");
        }
        Commands::Stats { parse } => {
            let (text, value) = parse.load()?;
            let stats = DocumentStats::collect(&value);
            let compact_bytes = value.to_json_string().len();

            println!("Root type:     {}", value.json_type());
            println!("Input size:    {} bytes", text.len());
            println!("Compact size:  {} bytes", compact_bytes);
            println!("Max depth:     {}", stats.max_depth);
            println!("Values:        {}", stats.total());
            for (json_type, count) in &stats.counts {
                println!("  {:<12}{}", format!("{json_type}:"), count);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the document. `RUST_LOG`
/// overrides the level chosen by `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Per-type value counts and the deepest container nesting of a document.
#[derive(Debug, Default, PartialEq)]
struct DocumentStats {
    counts: BTreeMap<String, usize>,
    max_depth: usize,
}

impl DocumentStats {
    fn collect(value: &Json) -> Self {
        let mut stats = DocumentStats::default();
        stats.visit(value, 0);
        stats
    }

    fn visit(&mut self, value: &Json, depth: usize) {
        *self.counts.entry(value.json_type().to_string()).or_default() += 1;
        match value.json_type() {
            JsonType::Array => {
                self.max_depth = self.max_depth.max(depth + 1);
                for item in value.as_array().into_iter().flatten() {
                    self.visit(item, depth + 1);
                }
            }
            JsonType::Object => {
                self.max_depth = self.max_depth.max(depth + 1);
                for item in value.as_object().into_iter().flat_map(|map| map.values()) {
                    self.visit(item, depth + 1);
                }
            }
            _ => {}
        }
    }

    fn total(&self) -> usize {
        self.counts.values().sum()
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
            print!("{}", content);
        }
    }
    Ok(())
}
