//! Fragment fetching.
//!
//! `FetchFragment` is the transport seam of the include pass. `HttpFetcher`
//! is the real implementation: one GET per call, credentials omitted, no
//! retry, no timeout, no cache.

use reqwest::Client;
use url::Url;

use super::error::{FragmentError, FragmentResult};

/// Something that can turn a resolved fragment URL into fragment markup.
pub trait FetchFragment {
    /// Fetch the fragment at `url` (the resolved, possibly relative, string).
    async fn fetch(&self, url: &str) -> FragmentResult;
}

/// Build the shared HTTP client.
///
/// No cookie store is configured, so requests never carry credentials.
pub fn build_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder().user_agent(user_agent).build()
}

/// HTTP fragment fetcher bound to the URL of the page being composed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Document URL that relative fragment URLs are resolved against.
    base: Option<Url>,
}

impl HttpFetcher {
    pub fn new(client: Client, base: Option<Url>) -> Self {
        Self { client, base }
    }

    /// Resolve a fragment URL the way a browser resolves it against the page.
    fn absolute(&self, url: &str) -> Result<Url, url::ParseError> {
        match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        }
    }
}

impl FetchFragment for HttpFetcher {
    async fn fetch(&self, url: &str) -> FragmentResult {
        let network = |cause: String| FragmentError::Network {
            url: url.to_string(),
            cause,
        };

        let target = self.absolute(url).map_err(|e| network(e.to_string()))?;
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FragmentError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| network(e.to_string()))
    }
}
