use crate::config::FetcherConfig;
use crate::source::FetchError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Thin wrapper over `reqwest::Client` for one-shot JSON GETs.
///
/// There is no retry loop: a request either succeeds or its error is
/// returned to the caller as-is.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self { inner })
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(FetchError::Transport)?;
        debug!("{}: {} bytes", url, body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}
