//! docs-gleaner main entry point
//!
//! This is the command-line interface for the docs-gleaner documentation crawler.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use docs_gleaner::config::{builtin_config, load_config_with_hash, Config};
use docs_gleaner::crawler::{crawl, AuthProfiles};
use docs_gleaner::output::print_summary;
use docs_gleaner::{CrawlMode, GleanerError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// docs-gleaner: crawl documentation sites into upload-ready text files
///
/// Each eligible page of every configured target is reduced to its main
/// content and written as one `.txt` file into a flat output directory.
#[derive(Parser, Debug)]
#[command(name = "docs-gleaner")]
#[command(version)]
#[command(about = "Crawl documentation sites into upload-ready text files", long_about = None)]
struct Cli {
    /// Which targets to crawl
    #[arg(value_enum, default_value_t = Mode::Plain)]
    mode: Mode,

    /// Path to TOML configuration file (built-in targets if omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Keep files left by a previous run (plain mode clears them otherwise)
    #[arg(long)]
    keep_existing: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Public documentation sites
    Plain,
    /// Sites behind a login, using credentials from the environment
    Auth,
}

impl From<Mode> for CrawlMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Plain => CrawlMode::Plain,
            Mode::Auth => CrawlMode::Authenticated,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(GleanerError::StartupMisconfiguration(message)) =
                e.downcast_ref::<GleanerError>()
            {
                print_auth_help(message);
            } else {
                tracing::error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = CrawlMode::from(cli.mode);

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let mut config = load(cli.config.as_ref())?;
    if let Some(dir) = cli.output_dir {
        config.crawler.output_dir = dir;
    }

    let profiles = Arc::new(AuthProfiles::from_env(&config.auth));

    if cli.dry_run {
        handle_dry_run(&config, mode, &profiles);
        return Ok(());
    }

    let clear_output = mode.clears_output() && !cli.keep_existing;
    match mode {
        CrawlMode::Plain => tracing::info!("Starting documentation crawler"),
        CrawlMode::Authenticated => tracing::info!("Starting authenticated crawler"),
    }

    let summary = crawl(&config, mode, profiles, clear_output).await?;
    print_summary(&summary, mode);

    Ok(())
}

/// Loads the configuration file, or the built-in targets when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in targets");
        return Ok(builtin_config());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_gleaner=info,warn"),
            1 => EnvFilter::new("docs_gleaner=debug,info"),
            2 => EnvFilter::new("docs_gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, mode: CrawlMode, profiles: &AuthProfiles) {
    println!("=== docs-gleaner Dry Run ({:?} mode) ===\n", mode);

    println!("Crawler Configuration:");
    println!("  Output directory: {}", config.crawler.output_dir.display());
    println!(
        "  Navigation timeout: {}ms",
        config.crawler.navigation_timeout_ms
    );
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages
    );
    println!("  Follow links: {}", config.crawler.follow_links);
    println!("  User agent: {}", config.user_agent.header_value());

    let selected: Vec<_> = config.targets.iter().filter(|t| mode.selects(t)).collect();
    println!("\nTargets ({}):", selected.len());
    for target in &selected {
        let note = if target.is_placeholder() {
            " [placeholder, will be skipped]"
        } else {
            ""
        };
        println!("  - {} (max {} pages){}", target.name, target.max_pages, note);
        for url in &target.start_urls {
            println!("    * {}", url);
        }
        if !target.include.is_empty() {
            println!("    include: {}", target.include.join(", "));
        }
        if !target.exclude.is_empty() {
            println!("    exclude: {}", target.exclude.join(", "));
        }
    }

    if mode == CrawlMode::Authenticated {
        println!(
            "\nAuth profiles: {} configured, usable: {}",
            profiles.len(),
            profiles.has_usable_profile()
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Explains how to provide credentials for authenticated mode
fn print_auth_help(message: &str) {
    println!("WARNING: {}.", message);
    println!();
    println!("To crawl authenticated sites:");
    println!("1. Copy .env.example to .env");
    println!("2. Login to your sites in a browser");
    println!("3. Open DevTools (F12) -> Network tab");
    println!("4. Refresh the page");
    println!("5. Find any request to your site");
    println!("6. Right-click -> Copy -> Copy as cURL");
    println!("7. Extract cookies and headers from the cURL command");
    println!("8. Update your .env file with the authentication data");
    println!();
    println!("Example:");
    println!("CONFLUENCE_COOKIES=\"JSESSIONID=abc123; atlassian.xsrf.token=xyz789\"");
    println!("CONFLUENCE_AUTH=\"Bearer your_token_here\"");
}
