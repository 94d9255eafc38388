//! `[serve]` section configuration.
//!
//! Contains composing proxy settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"             # Network interface (127.0.0.1 = localhost only)
//! port = 5278                         # HTTP port number
//! upstream = "http://127.0.0.1:8000"  # Origin serving the static site
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the proxy accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigDiagnostic;

/// Composing proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Origin that pages and fragments are loaded from.
    pub upstream: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5278,
            upstream: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl ServeConfig {
    /// Parsed upstream, normalized to end with `/` so request paths append
    /// below any path prefix it carries.
    pub fn upstream_url(&self) -> Result<Url, ConfigDiagnostic> {
        let invalid = |reason: String| {
            ConfigDiagnostic::new("serve.upstream", format!("`{}` {}", self.upstream, reason))
                .with_hint("use an absolute URL like http://127.0.0.1:8000")
        };

        let mut url = Url::parse(&self.upstream).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("is not an http(s) URL".into()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}
