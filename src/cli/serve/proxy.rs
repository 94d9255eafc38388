//! Upstream forwarding.
//!
//! ```text
//! GET /docs/a.html ──► upstream/docs/a.html
//!                          │
//!              2xx text/html?  ── no ──► pass through (status, type, body)
//!                          │ yes
//!                    include pass (fragments fetched from upstream)
//!                          │
//!                    composed page
//! ```

use anyhow::{Context, Result, bail};
use reqwest::{Client, Response, header::CONTENT_TYPE};
use tokio::runtime::Handle;
use url::Url;

use crate::cli::common::compose_page;
use crate::config::IncludeConfig;
use crate::debug;

/// What the proxy answers one request with.
#[derive(Debug, PartialEq, Eq)]
pub struct Forwarded {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Shared, read-only proxy state.
pub struct Proxy {
    upstream: Url,
    client: Client,
    include: IncludeConfig,
    runtime: Handle,
}

impl Proxy {
    /// `upstream` must end with `/` so request paths land below it.
    pub fn new(upstream: Url, client: Client, include: IncludeConfig, runtime: Handle) -> Self {
        Self {
            upstream,
            client,
            include,
            runtime,
        }
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// Map an origin-form request target (`/docs/a.html?x=1`) onto the upstream.
    ///
    /// Absolute-form targets (`http://other.host/x`) are rejected.
    pub fn target(&self, request_url: &str) -> Result<Url> {
        if !request_url.starts_with('/') {
            bail!("bad request target `{request_url}`");
        }
        let target = self
            .upstream
            .join(request_url.trim_start_matches('/'))
            .with_context(|| format!("bad request target `{request_url}`"))?;
        if target.origin() != self.upstream.origin() {
            bail!("request target `{request_url}` leaves the upstream");
        }
        Ok(target)
    }

    /// Forward one request, blocking the calling (non-runtime) thread.
    ///
    /// `HEAD` is answered from a full `GET` so its length matches the
    /// composed page. An `Err` means the upstream could not be reached.
    pub fn forward(&self, target: Url) -> Result<Forwarded> {
        self.runtime.block_on(self.forward_async(target))
    }

    async fn forward_async(&self, target: Url) -> Result<Forwarded> {
        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .with_context(|| format!("upstream request to {target} failed"))?;

        let status = response.status();
        let content_type = content_type(&response);

        if status.is_success() && is_html(&content_type) {
            let html = response
                .text()
                .await
                .with_context(|| format!("failed to read {target}"))?;
            let page = compose_page(&html, &target, &self.client, &self.include).await;
            debug!("serve"; "composed {} ({} includes)", target, page.includes);
            return Ok(Forwarded {
                status: status.as_u16(),
                content_type,
                body: page.html.into_bytes(),
            });
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read {target}"))?;
        Ok(Forwarded {
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// `text/html`, ignoring parameters such as `charset`.
fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
}
