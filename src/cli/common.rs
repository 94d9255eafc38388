//! Page composition shared by `render` and `serve`.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use url::Url;

use crate::config::IncludeConfig;
use crate::debug;
use crate::dom::Document;
use crate::include::{HttpFetcher, discover, process_includes};

/// Result of composing one page.
#[derive(Debug)]
pub struct ComposedPage {
    pub html: String,
    /// Placeholders found when the pass started.
    pub includes: usize,
}

/// Fetch a page the way a browser navigation would.
///
/// A non-2xx status is an error: there is no page to compose.
pub async fn load_page(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("failed to load {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("failed to load {url}: {status}");
    }

    response
        .text()
        .await
        .with_context(|| format!("failed to read body of {url}"))
}

/// Run one include pass over `html`, fetching fragments relative to `page_url`.
pub async fn compose_page(
    html: &str,
    page_url: &Url,
    client: &Client,
    include: &IncludeConfig,
) -> ComposedPage {
    let mut doc = Document::parse(html);
    let options = include.options_for(&doc);
    let includes = discover(&doc, &options).len();
    debug!("compose"; "{} (root: {:?}, {} includes)", page_url, options.root.as_str(), includes);

    let fetcher = HttpFetcher::new(client.clone(), Some(page_url.clone()));
    process_includes(&mut doc, &fetcher, &options).await;
    ComposedPage {
        html: doc.to_html(),
        includes,
    }
}
