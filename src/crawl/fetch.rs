// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages.
//
// Key functionality:
// - One GET request per URL, no retries
// - Status codes of 300 and above count as failures (after the client has
//   followed whatever redirects it follows by default)
// - On success the body is NOT read here; the caller streams it
//
// Rust concepts:
// - thiserror: derive Display/Error for our own error enum
// - Result<T, E> as a discriminated "outcome" type
// =============================================================================

use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// Why a fetch failed
//
// InvalidUrl and Transport are both "the request never got an answer";
// Status means the server answered with a code we don't crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed (relative hrefs end up here)
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connection, TLS, timeout or any other transport failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status of 300 or above
    #[error("Error ({status}): {url}")]
    Status { status: u16, url: String },
}

impl FetchError {
    /// True for failures where no usable response came back at all
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::InvalidUrl { .. } | FetchError::Transport(_))
    }
}

/// What a fetch produces: a page to read, or the reason there isn't one
pub type FetchOutcome = Result<Page, FetchError>;

// A successfully fetched page whose body has not been read yet
#[derive(Debug)]
pub struct Page {
    url: String,
    status: StatusCode,
    response: Response,
}

impl Page {
    /// The URL that was requested
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Next chunk of the body, or None once the body is exhausted
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, reqwest::Error> {
        self.response.chunk().await
    }
}

// Issues GET requests with a shared client
//
// The client is created once and reused for every page so connections
// are pooled across the whole crawl.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Creates a fetcher
    //
    // Parameters:
    //   timeout: per-request timeout; None keeps reqwest's default (no timeout)
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder =
            Client::builder().user_agent(concat!("link-crawler/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        log::debug!("Downloading {}", url);

        let parsed = Url::parse(url).map_err(|source| {
            let err = FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            };
            log::debug!("Error: {}", err);
            err
        })?;

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Error: {}", e);
                return Err(FetchError::Transport(e));
            }
        };

        let status = response.status();
        if status.as_u16() >= 300 {
            // The body is dropped unread along with the response
            let err = FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            };
            log::debug!("{}", err);
            return Err(err);
        }

        Ok(Page {
            url: url.to_string(),
            status,
            response,
        })
    }
}
