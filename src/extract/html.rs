// src/extract/html.rs
// =============================================================================
// This module extracts links from an HTML byte stream.
//
// We drive html5ever's tokenizer directly instead of building a DOM:
// - The body is fed to the tokenizer chunk by chunk as it arrives
// - Every token passes through a small state machine that pairs <a ...>
//   start tags with </a> end tags and collects the text in between
//
// The state machine mirrors how links are written in the wild, not how
// they should be written:
// - A second <a> before the first is closed replaces it ("last start wins")
// - A </a> with nothing open is logged and skipped
// - An <a> that never closes is never reported
// =============================================================================

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use html5ever::{local_name, Attribute, LocalName};

use super::Link;
use crate::crawl::Page;

// Pairing state for a single pass over one page
struct LinkCollector {
    depth: usize,
    max_depth: usize,
    // href of the currently open anchor ("" if it has none)
    open: Option<String>,
    text: String,
    links: Vec<Link>,
}

impl LinkCollector {
    fn new(depth: usize, max_depth: usize) -> Self {
        Self {
            depth,
            max_depth,
            open: None,
            text: String::new(),
            links: Vec::new(),
        }
    }

    fn text(&mut self, data: &str) {
        if self.open.is_some() {
            self.text.push_str(data);
        }
    }

    fn start_anchor(&mut self, attrs: &[Attribute]) {
        // Without attributes there can be no href
        if attrs.is_empty() {
            return;
        }

        // html5ever keeps only the first of duplicated attributes
        let href = attrs
            .iter()
            .find(|attr| attr.name.local == local_name!("href"))
            .map(|attr| attr.value.to_string())
            .unwrap_or_default();

        self.open = Some(href);
        self.text.clear();
    }

    fn end_anchor(&mut self) {
        let Some(href) = self.open.take() else {
            log::warn!("Link end found without start");
            return;
        };

        let text = std::mem::take(&mut self.text);
        let link = Link::new(&href, &text, self.depth);
        if link.is_valid(self.max_depth) {
            log::debug!("Link found {:?}", link);
            self.links.push(link);
        }
    }
}

// Receives tokens from html5ever and forwards the interesting ones
struct AnchorSink {
    collector: LinkCollector,
}

impl AnchorSink {
    fn tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        match tag.kind {
            TagKind::StartTag => {
                // <a href="x"/> is its own token kind in most tokenizers
                // and never opens an anchor
                if tag.name == local_name!("a") && !tag.self_closing {
                    self.collector.start_anchor(&tag.attrs);
                }
                raw_text_state(&tag.name)
            }
            TagKind::EndTag => {
                if tag.name == local_name!("a") {
                    self.collector.end_anchor();
                }
                TokenSinkResult::Continue
            }
        }
    }
}

impl TokenSink for AnchorSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.collector.text(&text),
            Token::TagToken(tag) => return self.tag(tag),
            // Comments, doctypes, NULs, parse errors and EOF carry no links
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

// Elements whose content is not markup. Without a tree builder the
// tokenizer relies on the sink to switch it into these states.
fn raw_text_state(name: &LocalName) -> TokenSinkResult<()> {
    match *name {
        local_name!("script") => TokenSinkResult::RawData(RawKind::ScriptData),
        local_name!("style")
        | local_name!("xmp")
        | local_name!("iframe")
        | local_name!("noembed")
        | local_name!("noframes")
        | local_name!("noscript") => TokenSinkResult::RawData(RawKind::Rawtext),
        local_name!("title") | local_name!("textarea") => {
            TokenSinkResult::RawData(RawKind::Rcdata)
        }
        // Everything after <plaintext> is text, to the end of the document
        local_name!("plaintext") => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Incremental link reader
///
/// Feed it raw body bytes in any chunking with [`LinkReader::feed`], then
/// call [`LinkReader::finish`] to get the valid links in discovery order.
pub struct LinkReader {
    tokenizer: Tokenizer<AnchorSink>,
    input: BufferQueue,
    // Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
}

impl LinkReader {
    pub fn new(depth: usize, max_depth: usize) -> Self {
        let sink = AnchorSink {
            collector: LinkCollector::new(depth, max_depth),
        };
        Self {
            tokenizer: Tokenizer::new(sink, TokenizerOpts::default()),
            input: BufferQueue::new(),
            pending: Vec::new(),
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);

        // Hold back an incomplete sequence at the end of the chunk; anything
        // else that fails to decode is replaced with U+FFFD
        let complete = match std::str::from_utf8(&self.pending) {
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            _ => self.pending.len(),
        };

        let text = String::from_utf8_lossy(&self.pending[..complete]).into_owned();
        self.pending.drain(..complete);
        self.push(text);
    }

    pub fn finish(mut self) -> Vec<Link> {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.push(rest);
        }
        self.tokenizer.end();
        std::mem::take(&mut self.tokenizer.sink.collector.links)
    }

    fn push(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from(text));
        // The sink never asks for a script pause, so feed always drains the queue
        let result = self.tokenizer.feed(&mut self.input);
        debug_assert!(matches!(result, TokenizerResult::Done));
    }
}

// Reads a fetched page to the end and returns the valid links on it
//
// Parameters:
//   page: the fetched page (consumed; the body is released afterwards)
//   depth: the depth the page's links belong to
//   max_depth: the crawl ceiling
//
// A read error part way through ends the stream early; whatever was found
// before it is still returned.
pub async fn extract_links(mut page: Page, depth: usize, max_depth: usize) -> Vec<Link> {
    let mut reader = LinkReader::new(depth, max_depth);

    loop {
        match page.chunk().await {
            Ok(Some(bytes)) => reader.feed(&bytes),
            Ok(None) => break,
            Err(e) => {
                log::warn!("Stopped reading {}: {}", page.url(), e);
                break;
            }
        }
    }

    let links = reader.finish();
    log::debug!(
        "{} link(s) found on {} ({})",
        links.len(),
        page.url(),
        page.status()
    );
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(html: &str, depth: usize) -> Vec<Link> {
        let mut reader = LinkReader::new(depth, 2);
        reader.feed(html.as_bytes());
        reader.finish()
    }

    #[test]
    fn test_extract_simple_link() {
        let links = read(r#"<p>See <a href="https://www.rust-lang.org">Rust</a>.</p>"#, 0);
        assert_eq!(links, vec![Link::new("https://www.rust-lang.org", "Rust", 0)]);
    }

    #[test]
    fn test_links_keep_document_order() {
        let html = r#"
            <ul>
              <li><a href="/one">One</a></li>
              <li><a href="/two">Two</a></li>
              <li><a href="/three">Three</a></li>
            </ul>
        "#;
        let urls: Vec<_> = read(html, 1).into_iter().map(|l| l.url).collect();
        assert_eq!(urls, vec!["/one", "/two", "/three"]);
    }

    #[test]
    fn test_nested_markup_text_is_accumulated() {
        let links = read(r#"<a href="/x">foo<b>bar</b>baz</a>"#, 0);
        assert_eq!(links, vec![Link::new("/x", "foobarbaz", 0)]);
    }

    #[test]
    fn test_href_and_text_are_trimmed() {
        let links = read("<a href=\"  /docs \">\n   Read the docs\n</a>", 0);
        assert_eq!(links[0].url, "/docs");
        assert_eq!(links[0].text, "Read the docs");
    }

    #[test]
    fn test_attributeless_anchor_is_ignored() {
        assert!(read("<a>link</a>", 0).is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_dropped() {
        assert!(read(r#"<a name="top">Top</a>"#, 0).is_empty());
    }

    #[test]
    fn test_orphan_end_tag_does_not_stop_extraction() {
        let links = read(r#"stray</a><a href="/after">After</a>"#, 0);
        assert_eq!(links, vec![Link::new("/after", "After", 0)]);
    }

    #[test]
    fn test_unterminated_anchor_is_never_reported() {
        let links = read(r#"<a href="/ok">Ok</a><a href="/open">Never closed"#, 0);
        assert_eq!(links, vec![Link::new("/ok", "Ok", 0)]);
    }

    #[test]
    fn test_last_start_wins() {
        let links = read(r#"<a href="/first">First <a href="/second">Second</a>"#, 0);
        assert_eq!(links, vec![Link::new("/second", "Second", 0)]);
    }

    #[test]
    fn test_invalid_candidates_are_filtered() {
        let html = r#"
            <a href="javascript:void(0)">Menu</a>
            <a href="/img"><img src="logo.png"></a>
            <a href="">Empty</a>
            <a href="/kept">Kept</a>
        "#;
        assert_eq!(read(html, 0), vec![Link::new("/kept", "Kept", 0)]);
    }

    #[test]
    fn test_nothing_reported_at_max_depth() {
        assert!(read(r#"<a href="/x">X</a>"#, 2).is_empty());
    }

    #[test]
    fn test_uppercase_tags_and_entities() {
        let links = read(r#"<A HREF="/q?a=1&amp;b=2">Tom &amp; Jerry</A>"#, 0);
        assert_eq!(links, vec![Link::new("/q?a=1&b=2", "Tom & Jerry", 0)]);
    }

    #[test]
    fn test_self_closing_anchor_is_ignored() {
        assert!(read(r#"<a href="/x"/>Text</a>"#, 0).is_empty());
    }

    #[test]
    fn test_script_content_is_not_markup() {
        let html = r#"
            <script>document.write('<a href="/fake">Fake</a>');</script>
            <a href="/real">Real</a>
        "#;
        assert_eq!(read(html, 0), vec![Link::new("/real", "Real", 0)]);
    }

    #[test]
    fn test_noscript_content_is_not_markup() {
        let html = r#"<noscript><a href="/ns">NoScript</a></noscript><a href="/real">Real</a>"#;
        assert_eq!(read(html, 0), vec![Link::new("/real", "Real", 0)]);
    }

    #[test]
    fn test_plaintext_swallows_the_rest() {
        let html = r#"<a href="/before">Before</a><plaintext><a href="/pt">Pt</a>"#;
        assert_eq!(read(html, 0), vec![Link::new("/before", "Before", 0)]);
    }

    #[test]
    fn test_duplicate_href_keeps_first() {
        let links = read(r#"<a href="/first" href="/second">Dup</a>"#, 0);
        assert_eq!(links, vec![Link::new("/first", "Dup", 0)]);
    }

    #[test]
    fn test_chunked_input_matches_whole_input() {
        let html = r#"<a href="/caf%C3%A9">Café déjà vu</a><a href="/b">B</a>"#;
        let mut reader = LinkReader::new(0, 2);
        // One byte at a time splits every tag and every multi-byte character
        for byte in html.as_bytes() {
            reader.feed(std::slice::from_ref(byte));
        }
        assert_eq!(reader.finish(), read(html, 0));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut reader = LinkReader::new(0, 2);
        reader.feed(b"<a href=\"/x\">bad \xff byte</a>");
        let links = reader.finish();
        assert_eq!(links[0].text, "bad \u{fffd} byte");
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_links_read_so_far() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            // Promise 1000 bytes, send far fewer, then hang up
            let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 1000\r\n\r\n\
                            <a href=\"/x\">X</a><a href=\"/y\">Y</a>";
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let fetcher = crate::crawl::Fetcher::new(None).unwrap();
        let page = fetcher.fetch(&format!("http://{}/", addr)).await.unwrap();
        let links = extract_links(page, 0, 2).await;

        assert_eq!(
            links,
            vec![Link::new("/x", "X", 0), Link::new("/y", "Y", 0)]
        );
    }
}
