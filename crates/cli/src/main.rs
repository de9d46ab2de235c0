use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use scrivener_core::{Document, ErrorKind, ExtractionResult, Extractor, ExtractorConfig, validate_url};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{print_banner, print_error, print_extraction_details, print_step, print_success, print_timing, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Html,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, html, text", s)),
        }
    }
}

/// Extract a post's title, body and thumbnail from a web page
#[derive(Parser, Debug)]
#[command(name = "scrivener")]
#[command(version)]
#[command(about = "Extract a post's title, body and thumbnail from a web page", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, html, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Minimum text length for a content candidate to be accepted
    #[arg(long, default_value = "200", value_name = "NUM")]
    min_length: usize,

    /// Base URL for resolving relative links in file or stdin input
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Keep the site name in the title
    #[arg(long)]
    keep_site_name: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "scrivener_core=debug,scrivener=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn render(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result).context("Failed to serialize result"),
        OutputFormat::Html => Ok(result.content_html.clone()),
        OutputFormat::Text => {
            let text = Document::parse(&result.content_html).text_content();
            Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n"))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
    }

    let mut builder = ExtractorConfig::builder()
        .timeout(Duration::from_secs(args.timeout))
        .min_content_length(args.min_length)
        .clean_title(!args.keep_site_name);
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua.clone());
    }

    let extractor = Extractor::with_config(builder.build()).context("Failed to configure extractor")?;
    let started = Instant::now();

    let result = if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if args.verbose {
            print_step(1, 2, &format!("Fetching {}", args.input.bright_white().underline()));
        }

        match extractor.extract(&args.input).await {
            Ok(result) => result,
            Err(err) => {
                print_error(&err.to_string());
                if let Some(details) = err.details() {
                    eprintln!("  {} {}", "Details:".dimmed(), details);
                }
                if err.kind() == ErrorKind::UpstreamHttp {
                    print_warning("The source site may be blocking automated requests.");
                }
                return Err(err).context("Failed to extract post");
            }
        }
    } else {
        let html = if args.input == "-" {
            if args.verbose {
                print_step(1, 2, "Reading from stdin");
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
            buffer
        } else {
            if args.verbose {
                print_step(1, 2, &format!("Reading from file {}", args.input.bright_white()));
            }
            fs::read_to_string(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
        };

        let base = args.base_url.as_deref().map(validate_url).transpose().context("Invalid --base-url")?;
        extractor.extract_html(&html, base.as_ref())
    };

    if args.verbose {
        print_timing("Extraction", started.elapsed());
        print_extraction_details(&result);
        print_step(2, 2, "Writing output");
    }

    let output = render(&result, args.format)?;
    tracing::debug!(format = ?args.format, bytes = output.len(), "rendered output");

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
