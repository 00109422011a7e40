// src/extract/mod.rs
// =============================================================================
// This module turns HTML into links.
//
// Submodules:
// - link: the Link value type, its validity rules and its printed form
// - html: the streaming tokenizer pass that pairs <a> tags with </a>
// =============================================================================

mod html;
mod link;

pub use html::extract_links;
pub use link::Link;
