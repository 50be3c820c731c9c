//! qail-array — inspect PostgreSQL array and bytea text values
//!
//! # Usage
//!
//! ```bash
//! # Decode a one-dimensional array
//! qail-array decode '{a,"b,c",NULL}'
//!
//! # Show the shape of any array
//! qail-array inspect '{{1,2},{3,4}}'
//!
//! # Build a literal
//! qail-array encode 'say "hi"' 'c:\tmp'
//!
//! # Decode a bytea value
//! qail-array bytea '\x48656c6c6f' --format text
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qail_array::config::{Config, OutputFormat};
use qail_array::error::render_dims;
use qail_array::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qail-array")]
#[command(author = "QAIL Contributors")]
#[command(version)]
#[command(about = "🪝 PostgreSQL array & bytea text codec", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-array decode '{a,\"b,c\",NULL}'
    qail-array inspect '{{1,2},{3,4}}' --format json
    qail-array encode one 'two, three'
    echo '\\x4869' | qail-array bytea - --format text")]
struct Cli {
    /// Config file (default: ./qail-array.toml, then the user config dir)
    #[arg(short, long, env = "QAIL_ARRAY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ByteaFormat {
    Hex,
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a one-dimensional array literal ("-" reads stdin)
    Decode {
        literal: String,
        /// Element delimiter
        #[arg(short, long)]
        delimiter: Option<String>,
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Show dimensions and elements of any array literal
    Inspect {
        literal: String,
        /// Element delimiter
        #[arg(short, long)]
        delimiter: Option<String>,
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Encode strings as a text[] literal
    Encode {
        items: Vec<String>,
    },
    /// Decode a bytea text value ("-" reads stdin)
    Bytea {
        literal: String,
        #[arg(short, long, value_enum, default_value = "hex")]
        format: ByteaFormat,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::Decode {
            literal,
            delimiter,
            format,
        } => {
            let input = read_literal(literal)?;
            let del = delimiter.as_deref().unwrap_or(&config.array.delimiter);
            let elements = scan_linear_array(input.as_bytes(), del.as_bytes(), "text[]")?;
            let format = format.map(OutputFormat::from).unwrap_or(config.output.format);
            print_elements(&elements, format);
        }
        Commands::Inspect {
            literal,
            delimiter,
            format,
        } => {
            let input = read_literal(literal)?;
            let del = delimiter.as_deref().unwrap_or(&config.array.delimiter);
            let parsed = parse_array(input.as_bytes(), del.as_bytes())?;
            let format = format.map(OutputFormat::from).unwrap_or(config.output.format);
            print_parsed(&parsed, format);
        }
        Commands::Encode { items } => {
            println!("{}", StringArray(items.clone()).to_literal());
        }
        Commands::Bytea { literal, format } => {
            let input = read_literal(literal)?;
            let bytes = decode_bytea(input.as_bytes())?;
            print_bytea(&bytes, *format)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins, then `--verbose`, then the configured level.
fn init_logging(config: &Config, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_literal(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read literal from stdin")?;
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

fn element_json(elem: &Element<'_>) -> serde_json::Value {
    match elem.as_bytes() {
        None => serde_json::Value::Null,
        Some(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

fn element_cell(elem: &Element<'_>) -> ColoredString {
    match elem.as_bytes() {
        None => "NULL".dimmed(),
        Some(b) => String::from_utf8_lossy(b).white(),
    }
}

fn print_elements(elements: &[Element<'_>], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = elements.iter().map(element_json).collect();
            println!("{}", serde_json::Value::Array(values));
        }
        OutputFormat::Table => {
            if elements.is_empty() {
                println!("{}", "(empty array)".dimmed());
                return;
            }
            let width = (elements.len() - 1).to_string().len();
            for (i, elem) in elements.iter().enumerate() {
                println!("{} │ {}", format!("{:>width$}", i).cyan(), element_cell(elem));
            }
            println!();
            println!("{} element(s)", elements.len().to_string().cyan());
        }
    }
}

fn print_parsed(parsed: &ParsedArray<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = parsed.elements.iter().map(element_json).collect();
            let out = serde_json::json!({
                "dims": parsed.dims,
                "elements": values,
            });
            println!("{}", out);
        }
        OutputFormat::Table => {
            let shape = render_dims(&parsed.dims);
            println!(
                "{} {} {}",
                "Dimensions:".green().bold(),
                parsed.dims.len(),
                shape.yellow()
            );
            print_elements(&parsed.elements, OutputFormat::Table);
        }
    }
}

fn print_bytea(bytes: &[u8], format: ByteaFormat) -> Result<()> {
    match format {
        ByteaFormat::Hex => println!("{}", hex::encode(bytes)),
        ByteaFormat::Text => println!("{}", String::from_utf8_lossy(bytes)),
        ByteaFormat::Json => println!("{}", serde_json::to_string(bytes)?),
    }
    Ok(())
}
