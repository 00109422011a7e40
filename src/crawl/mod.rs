// src/crawl/mod.rs
// =============================================================================
// This module handles fetching pages and walking the links between them.
//
// Features:
// - Depth-first traversal, one page at a time
// - Depth limit from CrawlConfig; nothing else bounds the crawl
// - A failed page ends only its own branch
//
// There is deliberately no visited set: a page linked from two places is
// fetched twice.
// =============================================================================

mod fetch;
mod recurse;

pub use fetch::{Fetcher, Page};
pub use recurse::Crawler;
