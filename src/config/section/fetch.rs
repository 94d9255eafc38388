//! `[fetch]` section configuration.
//!
//! ```toml
//! [fetch]
//! user_agent = "tola-include/0.1.0"
//! ```

use serde::{Deserialize, Serialize};

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// `User-Agent` sent with page and fragment requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("tola-include/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
