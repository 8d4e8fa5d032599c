//! `mailsift` command-line tool.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use mailsift::config::MailsiftConfig;
use mailsift::controller::ScrapeController;
use mailsift::core::ClipboardOptions;
use mailsift::events::{set_event_sink, EventSink, LoggingEventSink};
use mailsift::export::{copy_to_clipboard, default_backend, render_json, render_list};
use mailsift::host::{FilePageSource, PageSource};
use mailsift::observability::{init_tracing, LogFormat};
use mailsift::{dedupe, format_for_clipboard, is_valid_email};

#[derive(Debug, Parser)]
#[command(name = "mailsift", version, about = "Find email addresses in web pages")]
struct Cli {
    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract emails from a page.
    Scan(ScanArgs),
    /// Check addresses against the strict grammar.
    Validate {
        /// Addresses to check.
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Deduplicate addresses read one per line from stdin.
    Dedupe,
    /// Build the clipboard payload from addresses read one per line from stdin.
    Format {
        #[command(flatten)]
        output: PayloadArgs,
        /// Also copy the payload to the clipboard.
        #[arg(long)]
        copy: bool,
    },
}

#[derive(Debug, Args)]
struct PayloadArgs {
    /// Separator between addresses.
    #[arg(long, short)]
    separator: Option<String>,
    /// Prefix the payload with an "Emails found (N):" line.
    #[arg(long)]
    headers: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// HTML file to scan. Reads stdin when neither this nor --url is given.
    #[arg(long, short, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Page to fetch (requires the `fetch` feature).
    #[arg(long)]
    url: Option<String>,
    /// JSON configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Keep repeated addresses.
    #[arg(long)]
    include_duplicates: bool,
    /// Only keep addresses matching this regular expression.
    #[arg(long)]
    filter: Option<String>,
    /// Seconds to wait for the page.
    #[arg(long)]
    timeout: Option<f64>,
    /// Copy the result to the clipboard.
    #[arg(long)]
    copy: bool,
    /// Print {"emails": [...]} instead of a numbered list.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    payload: PayloadArgs,
}

impl PayloadArgs {
    fn apply(&self, mut options: ClipboardOptions) -> ClipboardOptions {
        if let Some(separator) = &self.separator {
            options = options.with_separator(unescape(separator));
        }
        if self.headers {
            options = options.with_headers(true);
        }
        options
    }
}

/// Lets `--separator '\n'` mean a newline.
fn unescape(separator: &str) -> String {
    separator.replace("\\n", "\n").replace("\\t", "\t")
}

fn read_lines() -> anyhow::Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

fn load_config(args: &ScanArgs) -> anyhow::Result<MailsiftConfig> {
    let mut config = match &args.config {
        Some(path) => MailsiftConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MailsiftConfig::default(),
    };
    if args.include_duplicates {
        config.scraping = config.scraping.with_duplicates(true);
    }
    if let Some(pattern) = &args.filter {
        config.scraping = config.scraping.with_filter_pattern(pattern)?;
    }
    if let Some(seconds) = args.timeout {
        config = config.with_scrape_timeout(seconds);
    }
    config.clipboard = args.payload.apply(config.clipboard);
    config.validate()?;
    Ok(config)
}

fn page_source(args: &ScanArgs, config: &MailsiftConfig) -> anyhow::Result<Arc<dyn PageSource>> {
    if let Some(url) = &args.url {
        return fetch_source(url, config);
    }
    Ok(match &args.file {
        Some(path) => Arc::new(FilePageSource::new(path)),
        None => Arc::new(FilePageSource::stdin()),
    })
}

#[cfg(feature = "fetch")]
fn fetch_source(url: &str, config: &MailsiftConfig) -> anyhow::Result<Arc<dyn PageSource>> {
    Ok(Arc::new(
        mailsift::host::HttpPageSource::new(url).with_timeout(config.scrape_timeout()),
    ))
}

#[cfg(not(feature = "fetch"))]
fn fetch_source(_url: &str, _config: &MailsiftConfig) -> anyhow::Result<Arc<dyn PageSource>> {
    anyhow::bail!("--url needs mailsift built with the `fetch` feature")
}

async fn scan(args: ScanArgs, sink: Arc<dyn EventSink>) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    let source = page_source(&args, &config)?;
    let controller = ScrapeController::new(source, default_backend(), config)?.with_sink(sink);

    let emails = controller.scrape().await?;
    if args.json {
        println!("{}", render_json(emails.as_slice())?);
    } else {
        println!("{}", render_list(emails.as_slice()));
    }

    if args.copy {
        let outcome = controller.copy().await;
        eprintln!("{}", outcome.message);
        if !outcome.success && outcome.count > 0 {
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints one verdict per address. Returns true if all are valid.
fn validate(emails: &[String]) -> bool {
    let mut all_valid = true;
    for email in emails {
        let valid = is_valid_email(email);
        all_valid &= valid;
        println!("{email}\t{}", if valid { "valid" } else { "invalid" });
    }
    all_valid
}

async fn format_stdin(output: &PayloadArgs, copy: bool) -> anyhow::Result<ExitCode> {
    let lines = read_lines()?;
    let options = output.apply(ClipboardOptions::default());
    let payload = format_for_clipboard(&lines, &options);
    println!("{payload}");
    if copy && !payload.is_empty() && !copy_to_clipboard(&payload).await {
        eprintln!("Failed to copy to clipboard");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let format_kind = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(format_kind, "warn");

    let sink: Arc<dyn EventSink> = Arc::new(LoggingEventSink::default());
    set_event_sink(Arc::clone(&sink));
    tracing::debug!(command = ?cli.command, "Starting");

    match cli.command {
        Command::Scan(args) => scan(args, sink).await,
        Command::Validate { emails } => Ok(if validate(&emails) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Command::Dedupe => {
            for email in dedupe(&read_lines()?) {
                println!("{email}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Format { output, copy } => format_stdin(&output, copy).await,
    }
}
