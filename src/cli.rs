// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: give it a URL and it crawls from there.
// Everything else is optional and defaults to the plain behavior:
// depth 2, text output, no request timeout.
// =============================================================================

use clap::Parser;
use std::time::Duration;

use crate::config::DEFAULT_MAX_DEPTH;

// The whole CLI
//
// #[derive(Parser)] generates the parsing code; a missing URL is reported
// by clap as a usage error and the process exits non-zero.
#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a website and print every link found, indented by depth",
    long_about = "link-crawler fetches a page, prints each link on it, then follows every \
                  link until the maximum depth is reached. Set RUST_LOG=debug to see each \
                  request as it happens."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    pub url: String,

    /// Maximum crawl depth
    ///
    /// Links on the starting page are depth 0. Only links with a depth
    /// below this value are printed, and only those below it minus one
    /// are followed.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print one JSON object per link instead of indented text
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
