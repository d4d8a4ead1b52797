use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use tracing::error;

use page_summary::{
    ExtractOptions, FetchOptions, OriginMode, PageSummary, SummaryConfig, TokenizerOptions,
    extract_summary, summarize_url,
};

#[derive(Clone, Copy, ValueEnum)]
enum OriginArg {
    /// Cut the URL after its first "com"
    Truncate,
    /// scheme://host[:port]
    Authority,
}

impl From<OriginArg> for OriginMode {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::Truncate => OriginMode::Truncate,
            OriginArg::Authority => OriginMode::Authority,
        }
    }
}

#[derive(Parser)]
#[command(name = "page-summary", version, about = "Print the link-preview summary of a web page as JSON")]
struct Cli {
    /// Page to fetch (or the page's URL when --file is given)
    url: Option<String>,

    /// Summarize a saved HTML document instead of fetching
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Fail on any tokenizer parse error
    #[arg(long)]
    strict: bool,

    /// How relative icon/image URLs are anchored
    #[arg(long, value_enum, default_value = "truncate")]
    origin: OriginArg,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Maximum body bytes to read
    #[arg(long, default_value = "1048576")]
    max_bytes: u64,

    /// User-Agent header value
    #[arg(long)]
    user_agent: Option<String>,
}

impl Cli {
    fn config(&self) -> SummaryConfig {
        let mut fetch = FetchOptions {
            timeout: Duration::from_secs(self.timeout),
            max_bytes: self.max_bytes,
            ..FetchOptions::default()
        };
        if let Some(user_agent) = &self.user_agent {
            fetch.user_agent = user_agent.clone();
        }

        SummaryConfig {
            fetch,
            extract: ExtractOptions {
                tokenizer: TokenizerOptions {
                    strict: self.strict,
                    ..TokenizerOptions::default()
                },
                origin: self.origin.into(),
            },
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<PageSummary> {
    let config = cli.config();

    match (&cli.file, &cli.url) {
        (Some(path), url) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let page_url = url.as_deref().unwrap_or_default();
            // same cap as a fetched body: reading stops, what was read is kept
            let html = BufReader::new(file).take(cli.max_bytes);
            extract_summary(page_url, html, &config.extract)
                .with_context(|| format!("summarizing {}", path.display()))
        }
        (None, Some(url)) => summarize_url(url, &config).with_context(|| format!("summarizing {url}")),
        (None, None) => bail!("a URL or --file is required"),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = run(&cli).and_then(|summary| {
        let json = if cli.pretty {
            summary.to_json_pretty()?
        } else {
            summary.to_json()?
        };
        Ok(json)
    });

    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
