//! Site-root prefix.

use crate::dom::Document;

/// Root prefix applied to relative fragment paths.
///
/// Read once before a pass starts and never changed during it. Empty means
/// "no prefixing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRoot(String);

impl SiteRoot {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the root from the page's bootstrap script.
    ///
    /// Looks at the first `<script>` whose `src` ends with `script`
    /// (e.g. `include.js`) and takes its `attribute` (e.g. `data-site-root`).
    /// No such script, or no such attribute, yields an empty root.
    pub fn from_document(doc: &Document, script: &str, attribute: &str) -> Self {
        doc.query_tag("script")
            .into_iter()
            .find(|&id| doc.attr(id, "src").is_some_and(|src| src.ends_with(script)))
            .and_then(|id| doc.attr(id, attribute))
            .map(Self::new)
            .unwrap_or_default()
    }
}

impl From<&str> for SiteRoot {
    fn from(root: &str) -> Self {
        Self::new(root)
    }
}
