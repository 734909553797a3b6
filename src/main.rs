//! Sumi-Scribe main entry point
//!
//! This is the command-line interface for the Sumi-Scribe site-to-Markdown
//! crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_scribe::config::{load_config_with_hash, Config};
use sumi_scribe::crawler::{Coordinator, CrawlMode, CrawlTarget};
use sumi_scribe::logging::{console_directives, init_console, TargetLogger};
use sumi_scribe::url::parse_url_argument;

/// Sumi-Scribe: crawl websites into Markdown files
///
/// Each URL is crawled into `<docs-dir>/<site>.md`, either the start page
/// alone or every page listed in the site's sitemap.xml, with a log file
/// per site under `<logs-dir>`.
#[derive(Parser, Debug)]
#[command(name = "sumi-scribe")]
#[command(version)]
#[command(about = "Crawl websites into Markdown files", long_about = None)]
struct Cli {
    /// URL to crawl: a single URL, a comma-separated list, or a JSON array
    #[arg(value_name = "URL")]
    url: String,

    /// Crawl every page listed in the sitemap instead of the start page only
    #[arg(short = 'g', long)]
    get_all_pages: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directives = console_directives(cli.verbose, cli.quiet);
    init_console(directives)?;

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    let urls = parse_url_argument(&cli.url);
    if urls.is_empty() {
        anyhow::bail!("No URL given");
    }

    let mode = CrawlMode::from_all_pages_flag(cli.get_all_pages);
    let targets: Vec<CrawlTarget> = urls
        .iter()
        .map(|url| CrawlTarget::from_url(url, mode, &config.output.default_filename))
        .collect();

    let task = format!(
        "Parsed arguments: {} target(s) {:?}, get all sub pages: {}",
        targets.len(),
        targets
            .iter()
            .map(|t| (t.url.as_str(), t.filename.as_str()))
            .collect::<Vec<_>>(),
        cli.get_all_pages
    );

    let logs_dir = config.output.logs_dir.clone();
    let coordinator = Coordinator::new(config)?;

    let mut failures = 0usize;
    for target in &targets {
        let logger = match TargetLogger::create(&logs_dir, &target.filename, directives) {
            Ok(logger) => logger,
            Err(e) => {
                tracing::error!("Skipping {}: {}", target.url, e);
                failures += 1;
                continue;
            }
        };

        logger.in_scope(|| {
            tracing::info!("{}", task);
            if let Some(hash) = &config_hash {
                tracing::info!("Configuration hash: {}", hash);
            }
        });

        match coordinator.execute(target, &logger).await {
            Ok(path) => logger.in_scope(|| {
                tracing::info!("Script finished. Output: {}", path.display());
            }),
            Err(e) => {
                failures += 1;
                logger.in_scope(|| tracing::error!("Failed to write {}: {}", target.filename, e));
            }
        }
    }

    if failures > 0 {
        tracing::warn!("{} of {} targets failed", failures, targets.len());
    }

    Ok(())
}
