//! `[include]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [include]
//! attribute = "data-include"          # placeholder attribute
//! site_root = ".."                    # omit to read it from the page
//! root_attribute = "data-site-root"   # attribute on the bootstrap script
//! script = "include.js"               # bootstrap script `src` suffix
//! error_class = "include-error"       # class of the inline diagnostic
//! ```

use serde::{Deserialize, Serialize};

use crate::dom::Document;
use crate::include::{DEFAULT_ATTRIBUTE, DEFAULT_ERROR_CLASS, IncludeOptions, SiteRoot};

/// Include pass settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeConfig {
    /// Attribute marking placeholders.
    pub attribute: String,

    /// Fixed site root. `None` reads it from the page's bootstrap script;
    /// `Some("")` disables prefixing even if the page declares a root.
    pub site_root: Option<String>,

    /// Attribute on the bootstrap script carrying the root.
    pub root_attribute: String,

    /// `src` suffix identifying the bootstrap script.
    pub script: String,

    /// Class of the `<pre>` rendered into failed placeholders.
    pub error_class: String,
}

impl Default for IncludeConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            site_root: None,
            root_attribute: "data-site-root".to_string(),
            script: "include.js".to_string(),
            error_class: DEFAULT_ERROR_CLASS.to_string(),
        }
    }
}

impl IncludeConfig {
    /// Snapshot the options for one pass over `doc`.
    pub fn options_for(&self, doc: &Document) -> IncludeOptions {
        let root = match &self.site_root {
            Some(root) => SiteRoot::new(root.as_str()),
            None => SiteRoot::from_document(doc, &self.script, &self.root_attribute),
        };
        IncludeOptions {
            root,
            attribute: self.attribute.clone(),
            error_class: self.error_class.clone(),
        }
    }
}
