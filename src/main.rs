//! Sitemap-Scout main entry point
//!
//! This is the command-line interface for the Sitemap-Scout discovery tool.

use clap::Parser;
use sitemap_scout::config::{load_config_with_hash, validate, Config};
use sitemap_scout::output::{
    print_statistics, write_all, DiscoveryStatistics, MarkdownOutput, OutputHandler,
    UrlListOutput,
};
use sitemap_scout::{Discoverer, SiteOrigin};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Scout: sitemap discovery for site audits
///
/// Sitemap-Scout locates a site's sitemaps through robots.txt or the
/// conventional paths, expands sitemap indexes, and writes the discovered
/// page URLs as a line-delimited list for crawling tools.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scout")]
#[command(version = "1.0.0")]
#[command(about = "Sitemap discovery for site audits", long_about = None)]
struct Cli {
    /// Site to audit, e.g. https://example.com
    #[arg(value_name = "ORIGIN")]
    origin: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the URL list (overrides the config)
    #[arg(short, long, value_name = "URL_LIST")]
    output: Option<PathBuf>,

    /// Where to write the markdown summary (overrides the config)
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and origin, then show the effective settings without fetching
    #[arg(long, conflicts_with = "locate_only")]
    dry_run: bool,

    /// Print the located sitemaps and exit without expanding them
    #[arg(long, conflicts_with = "dry_run")]
    locate_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(path) = &cli.output {
        config.output.url_list_path = path.display().to_string();
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = path.display().to_string();
    }
    validate(&config)?;

    let origin = match SiteOrigin::parse(&cli.origin) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!("Invalid origin '{}': {}", cli.origin, e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &origin);
    } else if cli.locate_only {
        handle_locate(config, &origin).await?;
    } else {
        handle_discovery(config, &origin, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scout=info,warn"),
            1 => EnvFilter::new("sitemap_scout=debug,info"),
            2 => EnvFilter::new("sitemap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if one was given, otherwise the defaults
fn load_configuration(
    path: Option<&std::path::Path>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, origin: &SiteOrigin) {
    println!("=== Sitemap-Scout Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", origin);
    println!("  robots.txt: {}", origin.robots_url());

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Max redirects: {}", config.fetcher.max_redirects);
    match config.fetcher.external_client() {
        Some(program) => println!("  External client: {}", program),
        None => println!("  External client: disabled"),
    }

    println!("\nRetry:");
    println!("  Max retries: {}", config.retry.max_retries);
    println!("  Base delay: {}ms", config.retry.base_delay_ms);

    println!("\nDiscovery:");
    println!("  Max index depth: {}", config.discovery.max_index_depth);
    if config.discovery.check_robots_rules {
        println!(
            "  Robots rule audit: enabled (agent: {})",
            config.discovery.robots_agent
        );
    } else {
        println!("  Robots rule audit: disabled");
    }

    println!("\nOutput:");
    println!("  URL list: {}", config.output.url_list_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --locate-only mode: prints located sitemaps
async fn handle_locate(
    config: Config,
    origin: &SiteOrigin,
) -> Result<(), Box<dyn std::error::Error>> {
    let discoverer = Discoverer::new(config)?;
    let outcome = discoverer.locate(origin).await;

    for reference in &outcome.references {
        println!("{}\t{:?}", reference.url(), reference.source());
    }

    Ok(())
}

/// Handles the main discovery run
async fn handle_discovery(
    config: Config,
    origin: &SiteOrigin,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let url_list = UrlListOutput::new(&config.output.url_list_path);
    let summary = MarkdownOutput::new(&config.output.summary_path);

    let discoverer = Discoverer::new(config)?;
    let result = discoverer.run(origin).await;

    let handlers: [&dyn OutputHandler; 2] = [&url_list, &summary];
    if let Err(e) = write_all(&handlers, &result) {
        tracing::error!("Failed to write output: {}", e);
        return Err(e.into());
    }

    tracing::info!(
        "Wrote {} URLs to {} and summary to {}",
        result.urls.len(),
        url_list.path().display(),
        summary.path().display()
    );

    if !quiet {
        print_statistics(&DiscoveryStatistics::from_result(&result));
    }

    Ok(())
}
