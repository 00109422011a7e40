// src/config.rs
// =============================================================================
// Crawl settings that are threaded through the driver and the extractor.
// =============================================================================

use crate::cli::Cli;

/// Depth ceiling used when none is given
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// How discovered links are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<tabs><text> (<depth>) - <url>`
    Text,
    /// One JSON object per line
    JsonLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Links are only reported and followed while depth < max_depth
    pub max_depth: usize,
    pub format: OutputFormat,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            format: OutputFormat::Text,
        }
    }
}

impl From<&Cli> for CrawlConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            max_depth: cli.max_depth,
            format: if cli.json {
                OutputFormat::JsonLines
            } else {
                OutputFormat::Text
            },
        }
    }
}
