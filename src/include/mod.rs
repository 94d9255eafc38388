//! Fragment includes.
//!
//! Elements declaring a fragment path (`<div data-include="parts/nav.html">`)
//! are replaced by the markup fetched from that path.
//!
//! # Module Structure
//!
//! - `path` - declared path + site root -> fetch URL
//! - `root` - the site-root prefix and its bootstrap-script lookup
//! - `fetch` - the transport seam and its HTTP implementation
//! - `target` - per-placeholder state
//! - `processor` - the pass itself
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Document::parse(&page);
//! let fetcher = HttpFetcher::new(client, Some(page_url));
//! process_includes(&mut doc, &fetcher, &IncludeOptions::default()).await;
//! ```

mod error;
mod fetch;
mod path;
mod processor;
mod root;
mod target;

pub use fetch::{HttpFetcher, build_client};
pub use processor::{
    DEFAULT_ATTRIBUTE, DEFAULT_ERROR_CLASS, IncludeOptions, IncludeTree, discover, process_includes,
};
pub use root::SiteRoot;
