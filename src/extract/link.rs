// src/extract/link.rs
// =============================================================================
// The Link type: one hyperlink found on a page.
//
// A Link is built once per matched <a ...>...</a> pair and never changes
// afterwards. Only links that pass `is_valid` ever leave the extractor.
// =============================================================================

use serde::Serialize;
use std::fmt;

// A discovered hyperlink
//
// #[derive(Serialize)] backs the --json output mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Trimmed value of the anchor's href attribute (empty if absent)
    pub url: String,
    /// Trimmed text found between the start and end tag
    pub text: String,
    /// Crawl depth the link was found at (0 = the seed page)
    pub depth: usize,
}

impl Link {
    /// Builds a candidate link, trimming both url and text
    pub fn new(url: &str, text: &str, depth: usize) -> Self {
        Self {
            url: url.trim().to_string(),
            text: text.trim().to_string(),
            depth,
        }
    }

    /// Returns true if the link should be reported and followed
    ///
    /// All of these must hold:
    /// - depth is below the crawl ceiling
    /// - text and url are non-empty
    /// - the url is not a javascript pseudo-URL (checked case-insensitively
    ///   anywhere in the url)
    pub fn is_valid(&self, max_depth: usize) -> bool {
        if self.depth >= max_depth {
            return false;
        }

        if self.text.is_empty() || self.url.is_empty() {
            return false;
        }

        !self.url.to_lowercase().contains("javascript")
    }
}

// Renders as "<depth tabs><text> (<depth>) - <url>"
impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str("\t")?;
        }
        write!(f, "{} ({}) - {}", self.text, self.depth, self.url)
    }
}
