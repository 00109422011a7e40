// src/crawl/recurse.rs
// =============================================================================
// This module walks a website depth-first.
//
// How it works:
// 1. Fetch the page (a failure is logged and ends this branch only)
// 2. Extract the valid links on it
// 3. For each link in order: print it, then crawl it if the next depth is
//    still below the limit
//
// Every step is awaited before the next one starts, so pages are fetched
// strictly one at a time and output appears in depth-first order.
//
// Rust concepts:
// - Recursive async functions need a boxed future (LocalBoxFuture)
// - Generic writers: stdout in main, a Vec<u8> in tests
// =============================================================================

use anyhow::{Context, Result};
use futures::future::{FutureExt, LocalBoxFuture};
use std::io::Write;

use super::Fetcher;
use crate::config::{CrawlConfig, OutputFormat};
use crate::extract::{extract_links, Link};

pub struct Crawler {
    fetcher: Fetcher,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(fetcher: Fetcher, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    // Crawls `url`, whose links belong to `depth`, writing every link found
    // below it to `out`
    //
    // Returns Err only when writing to `out` fails. Fetch failures are
    // logged and swallowed.
    pub fn crawl<'a, W: Write>(
        &'a self,
        url: &'a str,
        depth: usize,
        out: &'a mut W,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let page = match self.fetcher.fetch(url).await {
                Ok(page) => page,
                Err(e) => {
                    let kind = if e.is_transport() { "unreachable" } else { "bad status" };
                    log::error!("Skipping {} [{}]: {}", url, kind, e);
                    return Ok(());
                }
            };

            let links = extract_links(page, depth, self.config.max_depth).await;

            for link in &links {
                self.emit(link, out)?;
                if depth + 1 < self.config.max_depth {
                    self.crawl(&link.url, depth + 1, &mut *out).await?;
                }
            }

            Ok(())
        }
        .boxed_local()
    }

    fn emit<W: Write>(&self, link: &Link, out: &mut W) -> Result<()> {
        match self.config.format {
            OutputFormat::Text => {
                writeln!(out, "{}", link).context("failed to write link")?;
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut *out, link).context("failed to write link")?;
                writeln!(out).context("failed to write link")?;
            }
        }
        Ok(())
    }
}
