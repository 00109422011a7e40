// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG, default "info")
// 2. Parse command-line arguments using clap
// 3. Crawl from the given URL, printing links to stdout as they are found
// 4. Exit with proper code (0 = crawl finished, 2 = error)
//
// A page that fails to load is not an error here: it is logged and the
// crawl carries on with the next link.
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - crawl settings
mod crawl; // src/crawl/ - fetching and traversal
mod extract; // src/extract/ - link extraction

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use cli::Cli;
use config::CrawlConfig;
use crawl::{Crawler, Fetcher};

// A current-thread runtime is all we need: the crawl never does two
// things at once
#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parses arguments; on a missing URL clap prints usage and exits non-zero
    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<()> {
    let config = CrawlConfig::from(cli);
    let fetcher = Fetcher::new(cli.request_timeout()).context("failed to create HTTP client")?;
    let crawler = Crawler::new(fetcher, config);

    log::info!("Crawling {} (max depth {})", cli.url, config.max_depth);

    let mut stdout = std::io::stdout().lock();
    crawler.crawl(&cli.url, 0, &mut stdout).await?;
    stdout.flush().context("failed to flush stdout")?;

    Ok(())
}
