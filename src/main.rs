use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use translation_audit::config::Config;
use translation_audit::fetcher::HttpPageFetcher;
use translation_audit::oracle::OpenAiOracle;
use translation_audit::pipeline::{run_analysis, RunOptions};
use translation_audit::report;

/// Compare language versions of a web page and score their translation quality.
#[derive(Debug, Parser)]
#[command(name = "translation-audit", version, about)]
struct Cli {
    /// Page URLs, one per language version
    #[arg(required = true, num_args = 1..)]
    urls: Vec<String>,

    /// Follow language-switcher links found on the first URL
    #[arg(long)]
    discover: bool,

    /// Maximum number of discovered URLs to add
    #[arg(long, default_value_t = 5)]
    max_discovered: usize,

    /// Directory for the text report (overrides REPORT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write the full result as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Print the report without saving it
    #[arg(long)]
    no_save: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("translation_audit={}", level).parse()?),
        )
        .init();

    info!("Starting translation analysis of {} URLs", cli.urls.len());

    let config = Config::from_env()?;
    let report_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.report_dir));

    let fetcher = HttpPageFetcher::new(&config)?;
    let oracle = OpenAiOracle::new(config);
    let options = RunOptions {
        discover: cli.discover,
        max_discovered: cli.max_discovered,
    };

    let outcome = run_analysis(&fetcher, &oracle, &oracle, &cli.urls, &options).await?;

    let generated_at = chrono::Utc::now();
    let text = report::render(&outcome, generated_at);
    println!("{}", text);

    if !cli.no_save {
        report::save_report(&report_dir, generated_at, &text)?;
    }
    if let Some(path) = &cli.json {
        report::save_json_export(path, &outcome, generated_at)?;
    }

    info!("Analysis complete");
    Ok(())
}
