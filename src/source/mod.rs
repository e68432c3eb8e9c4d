pub mod http_client;

use crate::config::FetcherConfig;
use crate::models::Quote;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use self::http_client::HttpClient;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid quote endpoint: {0}")]
    Endpoint(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quote endpoint answered HTTP {0}")]
    Status(u16),

    #[error("malformed quote payload: {0}")]
    Decode(#[from] serde_json::Error),
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable quote source abstraction.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one snapshot for each of `symbols`, in the order the source returns them.
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, FetchError>;
}

// ── HTTP quote API ────────────────────────────────────────────────────────────

/// Quote source backed by a `GET {base}/quote/{SYM,SYM,...}` JSON endpoint.
pub struct HttpQuoteSource {
    client: HttpClient,
    base_url: Url,
}

impl HttpQuoteSource {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| FetchError::Endpoint(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::Endpoint(config.base_url.clone()));
        }

        Ok(Self {
            client: HttpClient::new(config)?,
            base_url,
        })
    }

    /// URL for a batch of symbols.  e.g. [AAPL, FB] → {base}/quote/AAPL,FB
    pub fn quote_url(&self, symbols: &[String]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .push("quote")
            .push(&symbols.join(","));
        Ok(url)
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, FetchError> {
        let url = self.quote_url(symbols)?;
        info!("Fetching {} quotes ({})", symbols.len(), url);

        let quotes: Vec<Quote> = self.client.get_json(&url).await?;

        debug!(
            "Received {} quotes: {:?}",
            quotes.len(),
            quotes.iter().map(|q| q.symbol.as_str()).collect::<Vec<_>>()
        );
        Ok(quotes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
