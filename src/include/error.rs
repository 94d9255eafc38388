//! Fragment fetch failures.

use thiserror::Error;

/// Outcome of fetching one fragment.
pub type FragmentResult = Result<String, FragmentError>;

/// Why a fragment could not be loaded.
///
/// Both variants carry the resolved URL that was attempted, which is what
/// ends up in the inline diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// The server answered with a non-2xx status.
    #[error("failed to load {url}: {status}")]
    Fetch { url: String, status: u16 },

    /// No response at all (DNS, connection, aborted body, unusable URL).
    #[error("failed to load {url}: {cause}")]
    Network { url: String, cause: String },
}

impl FragmentError {
    /// The resolved URL this failure refers to.
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } | Self::Network { url, .. } => url,
        }
    }
}
