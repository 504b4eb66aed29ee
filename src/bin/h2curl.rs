use std::{collections::BTreeMap, fs::File, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use h2curl::{OutputOptions, ParsedRequest};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Convert a raw HTTP request into a curl command line.
///
/// Reads the request (request-line, headers, blank line, optional body) from FILE or
/// stdin and prints the equivalent curl invocation on stdout.
#[derive(Debug, Parser)]
#[command(name = "h2curl", version, about, long_about = None)]
struct Cli {
    /// File holding the raw request. Reads stdin when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keep curl's default Accept and User-Agent headers
    #[arg(short = 'a', long)]
    allow_default_headers: bool,

    /// Print man page links for the options used after the command line
    #[arg(short = 'd', long)]
    docs: bool,

    /// Generate http:// URLs instead of https://
    #[arg(short = 'H', long)]
    http: bool,

    /// Do not pin the HTTP version
    #[arg(short = 'i', long)]
    ignore_http_version: bool,

    /// Use short command line options
    #[arg(short = 's', long)]
    short: bool,

    /// Add a verbose option to the command line
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Template variable for placeholders like {{ token }} in the request
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,
}

impl Cli {
    fn output_options(&self) -> OutputOptions {
        OutputOptions {
            allow_default_headers: self.allow_default_headers,
            use_http_scheme: self.http,
            ignore_http_version: self.ignore_http_version,
            use_short_flags: self.short,
            verbose: self.verbose,
            emit_docs: self.docs,
        }
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

/// Logs go to stderr; stdout only carries the command line.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_request(cli: &Cli) -> Result<ParsedRequest> {
    if !cli.vars.is_empty() {
        let input = match &cli.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => io::read_to_string(io::stdin()).context("failed to read stdin")?,
        };
        let context: BTreeMap<_, _> = cli.vars.iter().cloned().collect();
        return Ok(ParsedRequest::load(&input, context)?);
    }

    let request = match &cli.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            ParsedRequest::from_reader(file)?
        }
        None => ParsedRequest::from_reader(io::stdin().lock())?,
    };
    Ok(request)
}

fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();
    debug!(?cli, "starting");

    let request = read_request(&cli).context("failed to parse input")?;
    let command = request.to_curl(&cli.output_options())?;
    if let Some(unsupported) = &command.unsupported_body {
        warn!("{unsupported}");
    }

    println!("{command}");
    for doc in &command.docs {
        println!("{doc}");
    }
    Ok(())
}
